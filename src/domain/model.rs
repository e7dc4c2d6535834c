use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::error::{Result, TeamError};
use crate::utils::validation::normalize_name;

/// Skill tier, declared from strongest to weakest.
///
/// The derived `Ord` follows declaration (display) order, so `Tier::S` sorts
/// first. Use [`Tier::score`] when comparing strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

/// Static display and scoring data for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInfo {
    pub score: u32,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

const TIER_TABLE: [TierInfo; 5] = [
    TierInfo {
        score: 5,
        label: "S",
        description: "Elite",
        color: "#ff4757",
    },
    TierInfo {
        score: 4,
        label: "A",
        description: "Advanced",
        color: "#ff6b35",
    },
    TierInfo {
        score: 3,
        label: "B",
        description: "Upper intermediate",
        color: "#ffd700",
    },
    TierInfo {
        score: 2,
        label: "C",
        description: "Intermediate",
        color: "#00d4ff",
    },
    TierInfo {
        score: 1,
        label: "D",
        description: "Beginner",
        color: "#a8b2d8",
    },
];

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D];

    pub fn info(self) -> &'static TierInfo {
        &TIER_TABLE[self as usize]
    }

    pub fn score(self) -> u32 {
        self.info().score
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    pub fn color(self) -> &'static str {
        self.info().color
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = TeamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Tier::S),
            "A" => Ok(Tier::A),
            "B" => Ok(Tier::B),
            "C" => Ok(Tier::C),
            "D" => Ok(Tier::D),
            other => Err(TeamError::validation(
                "tier",
                other,
                "Tier must be one of S, A, B, C, D",
            )),
        }
    }
}

/// Current time truncated to whole milliseconds, the precision `createdAt`
/// is stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub tier: Tier,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// 建立新的參與者，名稱會先去除首尾空白再驗證
    pub fn new(name: &str, tier: Tier) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            tier,
            created_at: now_millis(),
        })
    }

    pub fn score(&self) -> u32 {
        self.tier.score()
    }
}

/// Team colors, cycled by team number.
pub const TEAM_COLORS: [&str; 8] = [
    "#ff4757", "#00d4ff", "#00ff88", "#ffd700", "#ff6b35", "#c678dd", "#e06c75", "#56b6c2",
];

/// Largest team count the palette (and strict validation) supports.
pub const MAX_TEAMS: usize = TEAM_COLORS.len();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub color: String,
    pub players: Vec<Participant>,
}

impl Team {
    /// Empty team for zero-based slot `index`.
    pub fn empty(index: usize) -> Self {
        let number = index + 1;
        Self {
            id: format!("team-{}", number),
            name: format!("Team {}", number),
            color: TEAM_COLORS[index % TEAM_COLORS.len()].to_string(),
            players: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    Random,
    #[default]
    Balanced,
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMode::Random => f.write_str("random"),
            AllocationMode::Balanced => f.write_str("balanced"),
        }
    }
}

impl FromStr for AllocationMode {
    type Err = TeamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(AllocationMode::Random),
            "balanced" => Ok(AllocationMode::Balanced),
            other => Err(TeamError::validation(
                "mode",
                other,
                "Mode must be 'random' or 'balanced'",
            )),
        }
    }
}

/// How requests outside the normal range are treated.
///
/// `Strict` rejects empty rosters, fewer than two teams, more teams than
/// participants, and more than [`MAX_TEAMS`] teams. `Lenient` only rejects a
/// team count of zero and otherwise hands back empty teams where there is
/// nobody to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPolicy {
    #[default]
    Strict,
    Lenient,
}

impl FromStr for AllocationPolicy {
    type Err = TeamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(AllocationPolicy::Strict),
            "lenient" => Ok(AllocationPolicy::Lenient),
            other => Err(TeamError::validation(
                "policy",
                other,
                "Policy must be 'strict' or 'lenient'",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest<'a> {
    pub participants: &'a [Participant],
    pub team_count: usize,
}

impl<'a> AllocationRequest<'a> {
    pub fn new(participants: &'a [Participant], team_count: usize) -> Self {
        Self {
            participants,
            team_count,
        }
    }

    /// Checks the request against `policy` before any allocation work.
    pub fn check(&self, policy: AllocationPolicy) -> Result<()> {
        let count = self.participants.len();

        if self.team_count == 0 {
            return Err(TeamError::invalid_config("team count must be positive"));
        }

        if policy == AllocationPolicy::Lenient {
            return Ok(());
        }

        if count == 0 {
            return Err(TeamError::invalid_config("the roster is empty"));
        }
        if self.team_count < 2 {
            return Err(TeamError::invalid_config(format!(
                "at least 2 teams are required (got {})",
                self.team_count
            )));
        }
        if self.team_count > MAX_TEAMS {
            return Err(TeamError::invalid_config(format!(
                "at most {} teams are supported (got {})",
                MAX_TEAMS, self.team_count
            )));
        }
        if self.team_count > count {
            return Err(TeamError::invalid_config(format!(
                "{} teams requested but only {} participants",
                self.team_count, count
            )));
        }

        Ok(())
    }
}
