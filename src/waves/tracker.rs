//! Wave progress bookkeeping.

use bevy::prelude::*;
use std::collections::HashSet;

/// Ask for the next wave to begin.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartNextWave;

/// A wave began; the spawner reacts to this.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveStartedEvent {
    pub wave_id: u32,
}

/// Every enemy of a wave is gone.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveCompletedEvent {
    pub wave_id: u32,
    /// This was the last wave needed to win.
    pub victory: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyCountChangedEvent {
    pub alive: u32,
    pub total: u32,
}

/// Result of removing an enemy from the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unregistered {
    /// Not a tracked member of the running wave.
    Ignored,
    Remaining(u32),
    /// Last one out.
    WaveCleared(u32),
}

/// Counts the live enemies of the running wave.
///
/// Each entity is counted at most once and only while its wave is running.
#[derive(Resource, Debug, Default)]
pub struct WaveProgress {
    current_wave: u32,
    enemies_alive: u32,
    total_this_wave: u32,
    in_progress: bool,
    members: HashSet<Entity>,
}

impl WaveProgress {
    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn enemies_alive(&self) -> u32 {
        self.enemies_alive
    }

    pub fn total_this_wave(&self) -> u32 {
        self.total_this_wave
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Begin the following wave with `planned` enemies. Returns its id.
    pub fn start_next_wave(&mut self, planned: u32) -> u32 {
        self.current_wave += 1;
        self.enemies_alive = 0;
        self.total_this_wave = planned;
        self.in_progress = true;
        self.members.clear();
        self.current_wave
    }

    /// Correct the planned total once the spawner knows how many it made.
    pub fn set_total(&mut self, wave_id: u32, total: u32) {
        if wave_id == self.current_wave {
            self.total_this_wave = total;
        }
    }

    /// Count `entity` as alive in `wave_id`. False if the wave is not the
    /// running one or the entity is already counted.
    pub fn register(&mut self, entity: Entity, wave_id: u32) -> bool {
        if !self.in_progress || wave_id != self.current_wave {
            return false;
        }
        if !self.members.insert(entity) {
            return false;
        }
        self.enemies_alive += 1;
        true
    }

    pub fn unregister(&mut self, entity: Entity) -> Unregistered {
        if !self.members.remove(&entity) {
            return Unregistered::Ignored;
        }
        self.enemies_alive = self.enemies_alive.saturating_sub(1);

        if self.enemies_alive == 0 && self.total_this_wave > 0 {
            self.in_progress = false;
            Unregistered::WaveCleared(self.current_wave)
        } else {
            Unregistered::Remaining(self.enemies_alive)
        }
    }

    /// End a wave that could not spawn anything.
    pub fn abandon(&mut self) {
        self.in_progress = false;
        self.total_this_wave = 0;
        self.enemies_alive = 0;
        self.members.clear();
    }
}

/// Counts down between waves.
#[derive(Resource, Debug)]
pub struct WaveCountdown(pub Timer);

impl WaveCountdown {
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }

    pub fn restart(&mut self, seconds: f32) {
        self.0 = Timer::from_seconds(seconds, TimerMode::Once);
    }
}

impl Default for WaveCountdown {
    fn default() -> Self {
        Self::new(5.0)
    }
}
