//! Random and tier-balanced team allocation.
//!
//! Both allocators are pure over their input roster: the participants are
//! borrowed, cloned into fresh [`Team`] values, and the only non-determinism
//! comes from the caller's RNG. Pass a seeded [`StdRng`] for reproducible
//! output.

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::domain::model::{
    AllocationMode, AllocationPolicy, AllocationRequest, Participant, Team,
};
use crate::utils::error::Result;

fn empty_teams(team_count: usize) -> Vec<Team> {
    (0..team_count).map(Team::empty).collect()
}

/// Shuffles the roster uniformly and deals it round-robin.
///
/// The participant at shuffled position `i` joins team `i % team_count`, so
/// team sizes differ by at most one and each team lists players in deal
/// order.
pub fn generate_random_teams<R: Rng + ?Sized>(
    participants: &[Participant],
    team_count: usize,
    policy: AllocationPolicy,
    rng: &mut R,
) -> Result<Vec<Team>> {
    AllocationRequest::new(participants, team_count).check(policy)?;

    let mut shuffled: Vec<&Participant> = participants.iter().collect();
    shuffled.shuffle(rng);

    let mut teams = empty_teams(team_count);
    for (idx, participant) in shuffled.into_iter().enumerate() {
        teams[idx % team_count].players.push(participant.clone());
    }

    tracing::debug!(
        "Dealt {} participants into {} random teams",
        participants.len(),
        team_count
    );
    Ok(teams)
}

/// Snake draft slot: rounds alternate left-to-right and right-to-left.
pub fn snake_slot(idx: usize, team_count: usize) -> usize {
    let round = idx / team_count;
    let position = idx % team_count;
    if round % 2 == 0 {
        position
    } else {
        team_count - 1 - position
    }
}

/// Per-team size limit for a roster of `total` split `team_count` ways.
///
/// At most `total % team_count` teams may grow to `total / team_count + 1`;
/// every other team stops at `total / team_count`.
#[derive(Debug, Clone, Copy)]
struct SizeCap {
    base: usize,
    oversized_slots: usize,
}

impl SizeCap {
    fn new(total: usize, team_count: usize) -> Self {
        Self {
            base: total / team_count,
            oversized_slots: total % team_count,
        }
    }

    fn open_teams(&self, sizes: &[usize]) -> Vec<bool> {
        let oversized = sizes.iter().filter(|&&size| size > self.base).count();
        let room_to_grow = oversized < self.oversized_slots;
        sizes
            .iter()
            .map(|&size| size < self.base || (size == self.base && room_to_grow))
            .collect()
    }
}

fn greedy_slot<R: Rng + ?Sized>(
    idx: usize,
    scores: &[u32],
    sizes: &[usize],
    cap: SizeCap,
    rng: &mut R,
) -> usize {
    let team_count = scores.len();
    let open = cap.open_teams(sizes);
    let min_score = scores.iter().copied().min().unwrap_or(0);

    let candidates: Vec<usize> = (0..team_count)
        .filter(|&t| open[t] && scores[t] == min_score)
        .collect();
    if let Some(&slot) = candidates.choose(rng) {
        return slot;
    }

    // 最低分的隊伍都已額滿，退回蛇形順序
    let snake = snake_slot(idx, team_count);
    if open[snake] {
        return snake;
    }

    let lowest_open = (0..team_count)
        .filter(|&t| open[t])
        .map(|t| scores[t])
        .min();
    let fallback: Vec<usize> = (0..team_count)
        .filter(|&t| open[t] && Some(scores[t]) == lowest_open)
        .collect();
    fallback.choose(rng).copied().unwrap_or(snake)
}

/// Tier-balanced draft.
///
/// Participants are ordered by descending tier score with a random order
/// inside each tier. The first `team_count` picks follow the snake draft so
/// every team is seeded once. After that each pick goes to a team with the
/// lowest running score that still has room, chosen at random among ties;
/// when no lowest-scoring team has room the pick falls back to its snake
/// slot, or to the lowest-scoring team with room.
///
/// The result is a best-effort balance, not an optimal partition.
pub fn generate_balanced_teams<R: Rng + ?Sized>(
    participants: &[Participant],
    team_count: usize,
    policy: AllocationPolicy,
    rng: &mut R,
) -> Result<Vec<Team>> {
    AllocationRequest::new(participants, team_count).check(policy)?;

    // 先洗牌再穩定排序，同一層級內的順序即為隨機
    let mut sorted: Vec<&Participant> = participants.iter().collect();
    sorted.shuffle(rng);
    sorted.sort_by(|a, b| b.score().cmp(&a.score()));

    let cap = SizeCap::new(sorted.len(), team_count);
    let mut teams = empty_teams(team_count);
    let mut scores = vec![0u32; team_count];
    let mut sizes = vec![0usize; team_count];

    for (idx, participant) in sorted.into_iter().enumerate() {
        let slot = if idx < team_count {
            snake_slot(idx, team_count)
        } else {
            greedy_slot(idx, &scores, &sizes, cap, rng)
        };

        tracing::trace!(
            "Pick {} ({}, tier {}) -> {}",
            idx,
            participant.name,
            participant.tier,
            teams[slot].name
        );

        teams[slot].players.push(participant.clone());
        scores[slot] += participant.score();
        sizes[slot] += 1;
    }

    tracing::debug!(
        "Drafted {} participants into {} balanced teams, totals {:?}",
        participants.len(),
        team_count,
        scores
    );
    Ok(teams)
}

/// Runs the allocator selected by `mode`.
pub fn generate_teams<R: Rng + ?Sized>(
    mode: AllocationMode,
    participants: &[Participant],
    team_count: usize,
    policy: AllocationPolicy,
    rng: &mut R,
) -> Result<Vec<Team>> {
    match mode {
        AllocationMode::Random => generate_random_teams(participants, team_count, policy, rng),
        AllocationMode::Balanced => generate_balanced_teams(participants, team_count, policy, rng),
    }
}

/// Owns a policy and an RNG so callers can regenerate repeatedly.
///
/// Each generator has its own RNG; generators are never shared between
/// callers.
#[derive(Debug)]
pub struct TeamGenerator {
    policy: AllocationPolicy,
    rng: StdRng,
}

impl TeamGenerator {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self {
            policy,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator, mainly for tests and `--seed` runs.
    pub fn with_seed(policy: AllocationPolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_optional_seed(policy: AllocationPolicy, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(policy, seed),
            None => Self::new(policy),
        }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn generate(
        &mut self,
        mode: AllocationMode,
        participants: &[Participant],
        team_count: usize,
    ) -> Result<Vec<Team>> {
        generate_teams(mode, participants, team_count, self.policy, &mut self.rng)
    }
}
