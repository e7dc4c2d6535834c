//! Team and roster scoring.

use crate::domain::model::{Participant, Team, Tier};
use std::collections::BTreeMap;

/// Sum of the members' tier scores. An empty team scores 0.
pub fn team_score(team: &Team) -> u32 {
    team.players.iter().map(Participant::score).sum()
}

/// Mean tier score per member, 0.0 for an empty team.
pub fn team_average_score(team: &Team) -> f64 {
    if team.players.is_empty() {
        return 0.0;
    }
    f64::from(team_score(team)) / team.players.len() as f64
}

/// Spread between the strongest and weakest team totals.
///
/// Lower is better and 0 means every team has the same total. An empty list
/// of teams scores 0.
pub fn balance_score(teams: &[Team]) -> u32 {
    let scores: Vec<u32> = teams.iter().map(team_score).collect();
    match (scores.iter().max(), scores.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}

/// Number of participants per tier. Every tier has an entry.
pub fn tier_distribution(participants: &[Participant]) -> BTreeMap<Tier, usize> {
    let mut distribution: BTreeMap<Tier, usize> = Tier::ALL.iter().map(|t| (*t, 0)).collect();
    for participant in participants {
        *distribution.entry(participant.tier).or_insert(0) += 1;
    }
    distribution
}

/// Share of the roster in each tier, in percent. All zero for an empty roster.
pub fn tier_shares(participants: &[Participant]) -> BTreeMap<Tier, f64> {
    let total = participants.len();
    tier_distribution(participants)
        .into_iter()
        .map(|(tier, count)| {
            let share = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            (tier, share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_of(index: usize, tiers: &[Tier]) -> Team {
        let mut team = Team::empty(index);
        team.players = tiers
            .iter()
            .enumerate()
            .map(|(i, tier)| Participant::new(&format!("p{}", i), *tier).unwrap())
            .collect();
        team
    }

    #[test]
    fn test_team_score_sums_tiers() {
        assert_eq!(team_score(&team_of(0, &[Tier::S, Tier::D, Tier::B])), 9);
        assert_eq!(team_score(&Team::empty(0)), 0);
    }

    #[test]
    fn test_team_score_rises_with_member_tier() {
        let weaker = team_of(0, &[Tier::C, Tier::B]);
        let stronger = team_of(1, &[Tier::A, Tier::B]);
        assert!(team_score(&stronger) > team_score(&weaker));
    }

    #[test]
    fn test_team_average_score() {
        let team = team_of(0, &[Tier::S, Tier::C]);
        assert!((team_average_score(&team) - 3.5).abs() < f64::EPSILON);
        assert_eq!(team_average_score(&Team::empty(0)), 0.0);
    }

    #[test]
    fn test_scoring_is_repeatable() {
        let team = team_of(0, &[Tier::A, Tier::D, Tier::D]);
        assert_eq!(team_score(&team), team_score(&team));
        assert_eq!(team_average_score(&team), team_average_score(&team));
    }

    #[test]
    fn test_balance_score() {
        assert_eq!(balance_score(&[]), 0);

        let even = [team_of(0, &[Tier::S]), team_of(1, &[Tier::A, Tier::D])];
        assert_eq!(balance_score(&even), 0);

        let uneven = [
            team_of(0, &[Tier::S, Tier::S]),
            team_of(1, &[Tier::D]),
            team_of(2, &[Tier::B]),
        ];
        assert_eq!(balance_score(&uneven), 9);

        assert_eq!(balance_score(&[team_of(0, &[Tier::A])]), 0);
    }

    #[test]
    fn test_tier_distribution_counts_every_tier() {
        let team = team_of(0, &[Tier::S, Tier::B, Tier::B]);
        let distribution = tier_distribution(&team.players);

        assert_eq!(distribution.len(), 5);
        assert_eq!(distribution[&Tier::S], 1);
        assert_eq!(distribution[&Tier::B], 2);
        assert_eq!(distribution[&Tier::D], 0);
    }

    #[test]
    fn test_tier_shares() {
        let team = team_of(0, &[Tier::S, Tier::B, Tier::B, Tier::D]);
        let shares = tier_shares(&team.players);

        assert!((shares[&Tier::S] - 25.0).abs() < 1e-9);
        assert!((shares[&Tier::B] - 50.0).abs() < 1e-9);
        assert_eq!(shares[&Tier::A], 0.0);
        assert!((shares.values().sum::<f64>() - 100.0).abs() < 1e-9);

        let empty = tier_shares(&[]);
        assert_eq!(empty.len(), 5);
        assert!(empty.values().all(|share| *share == 0.0));
    }
}
