use clap::Parser;
use std::fs::File;
use team_maker::adapters::csv_roster;
use team_maker::config::LogFormat;
use team_maker::utils::{logger, validation::Validate};
use team_maker::{
    balance_score, team_average_score, team_score, tier_distribution, tier_shares, AppConfig,
    Cli, Command, JsonFileStore, Participant, Roster, Team, TeamError, TeamGenerator, Tier,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "❌ Failed to load config file '{}': {}",
                cli.config.display(),
                e
            );
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(config.logging.verbose),
        LogFormat::Json => logger::init_json_logger(config.logging.verbose),
    }
    tracing::debug!("Effective config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<(), TeamError> {
    let store = JsonFileStore::new(&config.roster.path);
    tracing::debug!("Using roster file {}", store.path().display());
    let mut roster = Roster::load(store).await?;

    match command {
        Command::List { tier } => {
            let shown = roster.by_tier(tier);
            if shown.is_empty() {
                match tier {
                    Some(tier) => println!("No tier {} participants.", tier),
                    None => println!(
                        "Roster is empty. Try `team-maker add <name> --tier <S|A|B|C|D>`."
                    ),
                }
            }
            for participant in shown {
                println!(
                    "{}  [{}] {}",
                    participant.id, participant.tier, participant.name
                );
            }
        }
        Command::Add { name, tier } => {
            let participant = roster.add(&name, tier).await?;
            println!(
                "✅ Added {} ({}) as {}",
                participant.name, participant.tier, participant.id
            );
        }
        Command::Remove { id } => {
            let removed = roster.remove(id).await?;
            println!("✅ Removed {}", removed.name);
        }
        Command::Tier { id, tier } => {
            let updated = roster.update_tier(id, tier).await?;
            println!("✅ {} is now tier {}", updated.name, updated.tier);
        }
        Command::Rename { id, name } => {
            let updated = roster.update_name(id, &name).await?;
            println!("✅ Renamed to {}", updated.name);
        }
        Command::Clear => {
            let count = roster.len();
            roster.clear().await?;
            println!("✅ Removed {} participants", count);
        }
        Command::Import { path } => {
            let participants = csv_roster::read_roster(File::open(&path)?)?;
            let count = roster.import(participants).await?;
            println!("✅ Imported {} participants from {}", count, path.display());
        }
        Command::Export { path } => {
            csv_roster::write_roster(File::create(&path)?, roster.participants())?;
            println!("📁 Roster saved to: {}", path.display());
        }
        Command::Stats => print_stats(roster.participants()),
        Command::Generate(args) => {
            let generation = &config.generation;
            let mut generator =
                TeamGenerator::from_optional_seed(generation.policy, generation.seed);

            tracing::info!(
                "🎲 Generating {} {} teams from {} participants ({:?} policy)",
                generation.team_count,
                generation.mode,
                roster.len(),
                generator.policy()
            );
            let teams = generator.generate(
                generation.mode,
                roster.participants(),
                generation.team_count,
            )?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&teams)?);
            } else {
                print_teams(&teams);
            }

            if let Some(path) = &args.csv {
                csv_roster::write_teams(File::create(path)?, &teams)?;
                println!("📁 Teams saved to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_stats(participants: &[Participant]) {
    println!("📋 {} participants", participants.len());
    let shares = tier_shares(participants);
    for (tier, count) in tier_distribution(participants) {
        println!(
            "  {} ({:<18}) score {}  {}: {} ({:.1}%)",
            tier,
            tier.description(),
            tier.score(),
            tier.color(),
            count,
            shares[&tier]
        );
    }
}

fn print_teams(teams: &[Team]) {
    for team in teams {
        println!(
            "{} {}  total {}  avg {:.2}",
            team.color,
            team.name,
            team_score(team),
            team_average_score(team)
        );
        for player in &team.players {
            println!("    [{}] {}", player.tier, player.name);
        }
    }

    let spread = balance_score(teams);
    let verdict = if spread == 0 {
        "perfect"
    } else if spread <= Tier::D.score() * 2 {
        "good"
    } else {
        "uneven"
    };
    println!();
    println!("⚖️  Balance score: {} ({})", spread, verdict);
}
