//! CSV roster import and team export.

use crate::core::scoring::team_score;
use crate::domain::model::{now_millis, Participant, Team, Tier};
use crate::utils::error::{Result, TeamError};
use crate::utils::validation::normalize_name;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    tier: String,
}

#[derive(Debug, Serialize)]
struct TeamRow<'a> {
    team: &'a str,
    color: &'a str,
    player: &'a str,
    tier: Tier,
    score: u32,
}

/// Reads `name,tier[,id]` rows. Rows without an id get a fresh one.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Participant>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut participants = Vec::new();
    for (line, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        let tier: Tier = row.tier.parse().map_err(|_| {
            TeamError::validation(
                &format!("row {}.tier", line + 1),
                &row.tier,
                "Tier must be one of S, A, B, C, D",
            )
        })?;

        participants.push(Participant {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            name: normalize_name(&row.name)?,
            tier,
            created_at: now_millis(),
        });
    }

    tracing::debug!("Read {} participants from CSV", participants.len());
    Ok(participants)
}

/// Writes the roster as `id,name,tier` rows.
pub fn write_roster<W: Write>(writer: W, participants: &[Participant]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["id", "name", "tier"])?;
    for participant in participants {
        csv_writer.write_record([
            participant.id.to_string().as_str(),
            participant.name.as_str(),
            participant.tier.label(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes one row per player: `team,color,player,tier,score`.
pub fn write_teams<W: Write>(writer: W, teams: &[Team]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for team in teams {
        for player in &team.players {
            csv_writer.serialize(TeamRow {
                team: &team.name,
                color: &team.color,
                player: &player.name,
                tier: player.tier,
                score: player.score(),
            })?;
        }
        tracing::trace!("Exported {} with total {}", team.name, team_score(team));
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_roster_with_and_without_ids() {
        let data = "name,tier,id\n Ana ,s,\nBen,D,6f1c2a4e-8d1b-4b7a-9c55-1f0e4e2d9a11\n";
        let participants = read_roster(data.as_bytes()).unwrap();

        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].name, "Ana");
        assert_eq!(participants[0].tier, Tier::S);
        assert_eq!(
            participants[1].id.to_string(),
            "6f1c2a4e-8d1b-4b7a-9c55-1f0e4e2d9a11"
        );
    }

    #[test]
    fn test_read_roster_rejects_unknown_tier() {
        let data = "name,tier\nAna,Z\n";
        let err = read_roster(data.as_bytes()).unwrap_err();
        assert!(matches!(err, TeamError::ValidationError { .. }));
    }

    #[test]
    fn test_roster_round_trip_keeps_ids() {
        let original = vec![
            Participant::new("Ana", Tier::A).unwrap(),
            Participant::new("Ben", Tier::C).unwrap(),
        ];
        let mut buffer = Vec::new();
        write_roster(&mut buffer, &original).unwrap();

        let read_back = read_roster(buffer.as_slice()).unwrap();
        assert!(read_back
            .iter()
            .all(|p| p.created_at.timestamp_subsec_nanos() % 1_000_000 == 0));
        let ids: Vec<Uuid> = read_back.iter().map(|p| p.id).collect();
        assert_eq!(ids, original.iter().map(|p| p.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_write_teams() {
        let mut team = Team::empty(0);
        team.players.push(Participant::new("Ana", Tier::S).unwrap());
        let mut buffer = Vec::new();

        write_teams(&mut buffer, &[team]).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("team,color,player,tier,score"));
        assert_eq!(lines.next(), Some("Team 1,#ff4757,Ana,S,5"));
    }
}
