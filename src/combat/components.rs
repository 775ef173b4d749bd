//! Combat-related components.

use bevy::prelude::*;

/// Smallest multiplier accepted when scaling stats.
pub const MIN_STAT_MULTIPLIER: f32 = 0.01;

/// Clamp a stat multiplier to a positive floor (also catches NaN).
pub fn clamp_multiplier(multiplier: f32) -> f32 {
    if multiplier > MIN_STAT_MULTIPLIER {
        multiplier
    } else {
        MIN_STAT_MULTIPLIER
    }
}

/// What a call to [`Health::take_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// Already dead or non-positive amount.
    Unchanged,
    /// Hit points went down but the entity survives.
    Damaged,
    /// This hit killed the entity. Only ever returned once.
    Killed,
}

/// Component for entities that can take damage.
///
/// `dead` only ever goes from false to true.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
    dead: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            maximum: max,
            dead: false,
        }
    }

    pub fn take_damage(&mut self, amount: i32) -> HealthChange {
        if self.dead || amount <= 0 {
            return HealthChange::Unchanged;
        }

        self.current -= amount;
        if self.current <= 0 {
            self.dead = true;
            HealthChange::Killed
        } else {
            HealthChange::Damaged
        }
    }

    /// Returns true if hit points changed.
    pub fn heal(&mut self, amount: i32) -> bool {
        if self.dead || amount <= 0 {
            return false;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.maximum);
        self.current != before
    }

    pub fn set_max(&mut self, new_max: i32, fill_to_max: bool) {
        self.maximum = new_max.max(1);

        if !self.dead {
            if fill_to_max {
                self.current = self.maximum;
            } else {
                self.current = self.current.clamp(0, self.maximum);
            }
        }
    }

    pub fn apply_max_multiplier(&mut self, multiplier: f32, fill_to_max: bool) {
        let multiplier = clamp_multiplier(multiplier);
        let new_max = ((self.maximum as f32 * multiplier).round() as i32).max(1);
        self.set_max(new_max, fill_to_max);
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// Despawn this entity once its death has been processed (walls, props).
#[derive(Component, Default)]
pub struct DespawnOnDeath;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_then_death_reported_once() {
        let mut health = Health::new(10);

        assert_eq!(health.take_damage(4), HealthChange::Damaged);
        assert_eq!(health.current, 6);
        assert_eq!(health.take_damage(6), HealthChange::Killed);
        assert!(health.is_dead());
        assert_eq!(health.take_damage(6), HealthChange::Unchanged);
        assert_eq!(health.current, 0);
    }

    #[test]
    fn non_positive_damage_is_ignored() {
        let mut health = Health::new(5);
        assert_eq!(health.take_damage(0), HealthChange::Unchanged);
        assert_eq!(health.take_damage(-3), HealthChange::Unchanged);
        assert_eq!(health.current, 5);
    }

    #[test]
    fn heal_clamps_and_ignores_dead() {
        let mut health = Health::new(10);
        health.take_damage(3);
        assert!(health.heal(50));
        assert_eq!(health.current, 10);
        assert!(!health.heal(1));

        health.take_damage(10);
        assert!(!health.heal(5));
        assert_eq!(health.current, 0);
    }

    #[test]
    fn max_multiplier_rounds_and_floors() {
        let mut health = Health::new(10);
        health.apply_max_multiplier(1.25, true);
        assert_eq!(health.maximum, 13);
        assert_eq!(health.current, 13);

        health.apply_max_multiplier(-2.0, true);
        assert_eq!(health.maximum, 1);
    }

    #[test]
    fn set_max_without_fill_clamps_current() {
        let mut health = Health::new(20);
        health.take_damage(5);
        health.set_max(10, false);
        assert_eq!(health.current, 10);
        health.set_max(30, false);
        assert_eq!(health.current, 10);
        assert_eq!(health.maximum, 30);
    }

    #[test]
    fn multiplier_floor_catches_nan() {
        assert_eq!(clamp_multiplier(f32::NAN), MIN_STAT_MULTIPLIER);
        assert_eq!(clamp_multiplier(0.0), MIN_STAT_MULTIPLIER);
        assert_eq!(clamp_multiplier(1.5), 1.5);
    }
}
