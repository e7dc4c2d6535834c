pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};
pub use config::AppConfig;

pub use adapters::storage::{JsonFileStore, MemoryStore};
pub use crate::core::allocator::{
    generate_balanced_teams, generate_random_teams, generate_teams, TeamGenerator,
};
pub use crate::core::roster::Roster;
pub use crate::core::scoring::{
    balance_score, team_average_score, team_score, tier_distribution, tier_shares,
};
pub use domain::model::{
    AllocationMode, AllocationPolicy, AllocationRequest, Participant, Team, Tier, TierInfo,
};
pub use domain::ports::RosterStore;
pub use utils::error::{Result, TeamError};
