//! Reactive player pursuit with proximity hysteresis and hit-triggered aggro.

use bevy::prelude::*;

use super::data::AggroConfig;

/// Result of one aggro update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggroUpdate {
    /// The agent should pursue the player this tick.
    pub chasing: bool,
    /// Pursuit started this tick.
    pub began: bool,
}

/// Decides whether an agent should leave its default goal to chase the player.
#[derive(Debug, Clone)]
pub struct AggroController {
    settings: AggroConfig,
    proximity: bool,
    forced_until: Option<f32>,
    player: Option<Entity>,
    next_player_query: f32,
    chasing: bool,
}

impl AggroController {
    pub fn new(settings: AggroConfig) -> Self {
        Self {
            settings,
            proximity: false,
            forced_until: None,
            player: None,
            next_player_query: 0.0,
            chasing: false,
        }
    }

    pub fn enter_range(&self) -> f32 {
        self.settings.aggro_range
    }

    /// Never smaller than the enter range.
    pub fn exit_range(&self) -> f32 {
        self.settings.aggro_range.max(self.settings.disengage_range)
    }

    pub fn forced_until(&self) -> Option<f32> {
        self.forced_until
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Apply the enter/exit hysteresis for the current squared distance.
    pub fn update_proximity(&mut self, distance_sq: f32) -> bool {
        let enter = self.enter_range();
        let exit = self.exit_range();

        if self.proximity {
            if distance_sq > exit * exit {
                self.proximity = false;
            }
        } else if distance_sq <= enter * enter {
            self.proximity = true;
        }
        self.proximity
    }

    pub fn is_forced(&self, now: f32, distance_sq: f32) -> bool {
        let max = self.settings.hit_aggro_max_distance;
        self.forced_until.is_some_and(|until| now < until) && distance_sq <= max * max
    }

    /// Being hit forces pursuit for a while and makes an unknown player
    /// get looked up on the next update.
    pub fn notify_attacked(&mut self, now: f32) {
        self.forced_until = Some(now + self.settings.hit_aggro_duration);
        if self.player.is_none() {
            self.next_player_query = now;
        }
    }

    /// Return the cached player, looking it up with `find` at most once per
    /// requery interval while none is known.
    pub fn resolve_player(&mut self, now: f32, find: impl FnOnce() -> Option<Entity>) -> Option<Entity> {
        if self.player.is_none() && now >= self.next_player_query {
            self.next_player_query = now + self.settings.player_requery_interval;
            self.player = find();
        }
        self.player
    }

    /// Drop a player reference that no longer resolves.
    pub fn forget_player(&mut self) {
        self.player = None;
    }

    /// Advance the aggro state. `player_distance_sq` is `None` when there is
    /// no live player to measure against.
    pub fn update(&mut self, now: f32, player_distance_sq: Option<f32>) -> AggroUpdate {
        let was_chasing = self.chasing;

        self.chasing = match player_distance_sq {
            Some(distance_sq) => {
                let proximity = self.update_proximity(distance_sq);
                proximity || self.is_forced(now, distance_sq)
            }
            None => {
                self.proximity = false;
                false
            }
        };

        AggroUpdate {
            chasing: self.chasing,
            began: self.chasing && !was_chasing,
        }
    }

    /// Stop chasing without touching timers (used when the agent cannot target players).
    pub fn reset(&mut self) {
        self.proximity = false;
        self.chasing = false;
    }
}
