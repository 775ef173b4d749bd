//! Swing timing for enemies whose hits are confirmed by a hit frame.

use bevy::prelude::*;

use super::ai::{AttackHitEvent, AttackStartedEvent};

/// Tracks one swing and fires [`AttackHitEvent`] at its hit frame.
#[derive(Component, Debug)]
pub struct AttackSwing {
    /// Seconds from swing start to the hit frame.
    pub hit_frame: f32,
    elapsed: f32,
    active: bool,
    hit_fired: bool,
}

impl AttackSwing {
    pub fn new(hit_frame: f32) -> Self {
        Self {
            hit_frame: hit_frame.max(0.0),
            elapsed: 0.0,
            active: false,
            hit_fired: false,
        }
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
        self.hit_fired = false;
    }

    /// Advance the swing. True on the step that reaches the hit frame.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.active || self.hit_fired {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed >= self.hit_frame {
            self.hit_fired = true;
            self.active = false;
            return true;
        }
        false
    }
}

pub fn start_swings(mut started: EventReader<AttackStartedEvent>, mut swings: Query<&mut AttackSwing>) {
    for event in started.read() {
        if let Ok(mut swing) = swings.get_mut(event.attacker) {
            swing.restart();
        }
    }
}

pub fn detect_attack_hit(
    time: Res<Time>,
    mut swings: Query<(Entity, &mut AttackSwing)>,
    mut hits: EventWriter<AttackHitEvent>,
) {
    for (entity, mut swing) in swings.iter_mut() {
        if swing.advance(time.delta_secs()) {
            hits.send(AttackHitEvent { attacker: entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_at_hit_frame() {
        let mut swing = AttackSwing::new(0.25);

        assert!(!swing.advance(1.0));
        swing.restart();
        assert!(!swing.advance(0.125));
        assert!(swing.advance(0.125));
        assert!(!swing.advance(0.125));

        swing.restart();
        assert!(swing.advance(0.5));
    }
}
