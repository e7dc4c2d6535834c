use crate::config::toml_config::{AppConfig, LogFormat, DEFAULT_CONFIG_FILE};
use crate::domain::model::{AllocationMode, AllocationPolicy, Tier};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Parser)]
#[command(name = "team-maker")]
#[command(about = "Split a tiered roster into random or balanced teams")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Roster JSON file (overrides roster.path)
    #[arg(long)]
    pub roster: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the roster
    List {
        /// Only show participants of this tier
        #[arg(short, long)]
        tier: Option<Tier>,
    },
    /// Add a participant
    Add {
        name: String,
        #[arg(short, long, default_value = "B")]
        tier: Tier,
    },
    /// Remove a participant by id
    Remove { id: Uuid },
    /// Change a participant's tier
    Tier { id: Uuid, tier: Tier },
    /// Rename a participant
    Rename { id: Uuid, name: String },
    /// Remove every participant
    Clear,
    /// Replace the roster with the rows of a CSV file (name,tier[,id])
    Import { path: PathBuf },
    /// Write the roster to a CSV file
    Export { path: PathBuf },
    /// Show the tier distribution
    Stats,
    /// Build teams from the current roster
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// random or balanced (overrides generation.mode)
    #[arg(short, long)]
    pub mode: Option<AllocationMode>,

    /// Number of teams (overrides generation.team_count)
    #[arg(short, long)]
    pub teams: Option<usize>,

    /// strict or lenient (overrides generation.policy)
    #[arg(long)]
    pub policy: Option<AllocationPolicy>,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the teams as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the teams to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Cli {
    /// 命令列參數覆蓋設定檔的值
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(roster) = &self.roster {
            config.roster.path = roster.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }

        if let Command::Generate(args) = &self.command {
            if let Some(mode) = args.mode {
                config.generation.mode = mode;
            }
            if let Some(teams) = args.teams {
                config.generation.team_count = teams;
            }
            if let Some(policy) = args.policy {
                config.generation.policy = policy;
            }
            if args.seed.is_some() {
                config.generation.seed = args.seed;
            }
        }
    }
}
