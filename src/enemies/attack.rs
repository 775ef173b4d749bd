//! Attack cycle: cooldown, windup, and hit confirmation.

use super::data::{AttackConfig, HitConfirmation};
use super::targeting::TargetCategory;

/// Where the current swing is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AttackPhase {
    /// Waiting for the cooldown (or for a target).
    #[default]
    Idle,
    /// Timer mode: damage lands at `hit_at`.
    Windup { hit_at: f32 },
    /// External mode: damage lands when the hit is confirmed from outside.
    AwaitingHit,
}

/// Cooldown/windup state machine nested in the Attack state.
#[derive(Debug, Clone, Default)]
pub struct AttackCycle {
    phase: AttackPhase,
    next_attack_allowed: f32,
}

impl AttackCycle {
    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn next_attack_allowed(&self) -> f32 {
        self.next_attack_allowed
    }

    pub fn scheduled_hit(&self) -> Option<f32> {
        match self.phase {
            AttackPhase::Windup { hit_at } => Some(hit_at),
            _ => None,
        }
    }

    pub fn hit_pending(&self) -> bool {
        self.phase != AttackPhase::Idle
    }

    pub fn can_start(&self, now: f32) -> bool {
        now >= self.next_attack_allowed
    }

    /// Start a swing if the cooldown allows it.
    ///
    /// The cooldown runs from the swing start, so the windup is part of it.
    pub fn start(&mut self, now: f32, config: &AttackConfig) -> bool {
        if !self.can_start(now) {
            return false;
        }

        self.next_attack_allowed = now + config.cooldown;
        self.phase = match config.hit_confirmation {
            HitConfirmation::Timer => AttackPhase::Windup {
                hit_at: now + config.windup,
            },
            HitConfirmation::External => AttackPhase::AwaitingHit,
        };
        true
    }

    /// Timer mode: true exactly once when the windup has elapsed.
    pub fn poll_timer(&mut self, now: f32) -> bool {
        match self.phase {
            AttackPhase::Windup { hit_at } if now >= hit_at => {
                self.phase = AttackPhase::Idle;
                true
            }
            _ => false,
        }
    }

    /// External mode: true if a swing was waiting for its hit.
    pub fn confirm_external(&mut self) -> bool {
        if self.phase == AttackPhase::AwaitingHit {
            self.phase = AttackPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Drop the pending hit, keeping the cooldown.
    pub fn cancel_hit(&mut self) {
        self.phase = AttackPhase::Idle;
    }
}

/// Damage a hit deals to a target of `category`, or `None` for targets this
/// enemy does not damage.
pub fn damage_for(
    category: TargetCategory,
    config: &AttackConfig,
    wall_damage: i32,
    can_target_player: bool,
) -> Option<i32> {
    match category {
        TargetCategory::Player if can_target_player => Some(config.player_damage),
        TargetCategory::Wall => Some(wall_damage),
        TargetCategory::Core => Some(config.core_damage),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: HitConfirmation) -> AttackConfig {
        AttackConfig {
            cooldown: 1.0,
            windup: 0.25,
            hit_confirmation: mode,
            ..AttackConfig::default()
        }
    }

    #[test]
    fn swings_are_a_cooldown_apart() {
        let config = config(HitConfirmation::Timer);
        let mut cycle = AttackCycle::default();
        let mut starts = Vec::new();
        let mut hits = 0;

        // 4 seconds of fixed steps at 1/64 s.
        for step in 0..256 {
            let now = step as f32 / 64.0;
            if cycle.poll_timer(now) {
                hits += 1;
            }
            if cycle.start(now, &config) {
                starts.push(now);
            }
        }

        assert_eq!(starts.len(), 4);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= config.cooldown);
        }
        assert_eq!(hits, 4);
    }

    #[test]
    fn timer_hit_fires_once() {
        let config = config(HitConfirmation::Timer);
        let mut cycle = AttackCycle::default();

        assert!(cycle.start(0.0, &config));
        assert_eq!(cycle.scheduled_hit(), Some(0.25));
        assert!(!cycle.poll_timer(0.2));
        assert!(cycle.poll_timer(0.25));
        assert!(!cycle.poll_timer(0.3));
        assert!(!cycle.hit_pending());
    }

    #[test]
    fn start_is_refused_during_cooldown() {
        let config = config(HitConfirmation::Timer);
        let mut cycle = AttackCycle::default();

        assert!(cycle.start(2.0, &config));
        assert!(!cycle.start(2.5, &config));
        assert_eq!(cycle.next_attack_allowed(), 3.0);
        assert!(cycle.start(3.0, &config));
    }

    #[test]
    fn external_mode_waits_for_confirmation() {
        let config = config(HitConfirmation::External);
        let mut cycle = AttackCycle::default();

        assert!(!cycle.confirm_external());
        assert!(cycle.start(0.0, &config));
        assert!(!cycle.poll_timer(10.0));
        assert!(cycle.confirm_external());
        assert!(!cycle.confirm_external());
    }

    #[test]
    fn unconfirmed_external_hit_never_lands() {
        let config = config(HitConfirmation::External);
        let mut cycle = AttackCycle::default();

        cycle.start(0.0, &config);
        for step in 0..100 {
            assert!(!cycle.poll_timer(step as f32));
        }
        assert!(cycle.hit_pending());
    }

    #[test]
    fn damage_routing_by_category() {
        let config = AttackConfig {
            player_damage: 3,
            core_damage: 7,
            ..AttackConfig::default()
        };

        assert_eq!(damage_for(TargetCategory::Player, &config, 9, true), Some(3));
        assert_eq!(damage_for(TargetCategory::Player, &config, 9, false), None);
        assert_eq!(damage_for(TargetCategory::Wall, &config, 9, true), Some(9));
        assert_eq!(damage_for(TargetCategory::Core, &config, 9, true), Some(7));
        assert_eq!(damage_for(TargetCategory::Unknown, &config, 9, true), None);
    }
}
