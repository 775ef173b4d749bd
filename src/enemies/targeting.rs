//! Candidate bookkeeping and attack target selection.

use bevy::prelude::*;

use super::data::TargetingConfig;

/// What kind of target a collider is. Resolved once when it enters a sensor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetCategory {
    Player,
    Wall,
    Core,
    #[default]
    Unknown,
}

impl TargetCategory {
    /// Static structures (walls and the core), as opposed to the player.
    pub fn is_structure(self) -> bool {
        matches!(self, Self::Wall | Self::Core)
    }
}

/// A collider currently inside an enemy's sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The collider that entered the sensor.
    pub collider: Entity,
    /// The entity holding the `Health` for that collider (itself or its parent).
    pub owner: Entity,
    pub category: TargetCategory,
}

/// Colliders overlapping the sensor, in the order they entered.
#[derive(Debug, Clone, Default)]
pub struct TargetCandidates {
    entries: Vec<Candidate>,
}

impl TargetCandidates {
    /// Returns false if the collider is already known.
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        if self.contains(candidate.collider) {
            return false;
        }
        self.entries.push(candidate);
        true
    }

    pub fn remove(&mut self, collider: Entity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|c| c.collider != collider);
        self.entries.len() != before
    }

    pub fn contains(&self, collider: Entity) -> bool {
        self.entries.iter().any(|c| c.collider == collider)
    }

    /// Drop every candidate for which `keep` is false. Returns how many went.
    pub fn prune(&mut self, mut keep: impl FnMut(&Candidate) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|c| keep(c));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct Nearest(Option<(Candidate, f32)>);

impl Nearest {
    // Strict comparison keeps the first-scanned candidate on ties.
    fn offer(&mut self, candidate: Candidate, distance_sq: f32) {
        if self.0.map_or(true, |(_, best)| distance_sq < best) {
            self.0 = Some((candidate, distance_sq));
        }
    }

    fn get(&self) -> Option<Candidate> {
        self.0.map(|(candidate, _)| candidate)
    }
}

/// Pick at most one attack target from `candidates`.
///
/// The nearest candidate of each category is found in one pass, then:
/// 1. `force_player`: the nearest player or nothing.
/// 2. `prefer_player_over_wall` and a player is present: the player.
/// 3. Walls before the core (or the reverse), with the player last.
///
/// Candidates whose position is unknown are skipped.
pub fn select_target(
    candidates: &TargetCandidates,
    origin: Vec2,
    config: &TargetingConfig,
    force_player: bool,
    position_of: impl Fn(Entity) -> Option<Vec2>,
) -> Option<Candidate> {
    let mut player = Nearest::default();
    let mut wall = Nearest::default();
    let mut core = Nearest::default();

    for candidate in candidates.iter() {
        if !config.accepts(candidate.category) {
            continue;
        }
        let Some(position) = position_of(candidate.collider) else {
            continue;
        };
        let distance_sq = origin.distance_squared(position);

        match candidate.category {
            TargetCategory::Player => player.offer(*candidate, distance_sq),
            TargetCategory::Wall => wall.offer(*candidate, distance_sq),
            TargetCategory::Core => core.offer(*candidate, distance_sq),
            TargetCategory::Unknown => {}
        }
    }

    if force_player {
        return player.get();
    }

    if config.prefer_player_over_wall && player.get().is_some() {
        return player.get();
    }

    let (first, second) = if config.prefer_wall_over_core {
        (wall.get(), core.get())
    } else {
        (core.get(), wall.get())
    };

    first.or(second).or(player.get())
}
