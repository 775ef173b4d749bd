//! Wave table loaded from `assets/data/waves.ron`.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{load_ron_file, DataLoadError};

fn default_spawn_count() -> u32 {
    5
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_enemy_type() -> String {
    "zombie".to_string()
}

fn default_intermission() -> f32 {
    5.0
}

/// One wave's size and difficulty.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WaveDefinition {
    pub wave_id: u32,
    #[serde(default = "default_spawn_count")]
    pub spawn_count: u32,
    #[serde(default = "default_multiplier")]
    pub hp_multiplier: f32,
    #[serde(default = "default_multiplier")]
    pub speed_multiplier: f32,
    #[serde(default = "default_multiplier")]
    pub wall_damage_multiplier: f32,
}

impl WaveDefinition {
    /// Used for wave ids missing from the table.
    pub fn fallback(wave_id: u32) -> Self {
        Self {
            wave_id,
            spawn_count: default_spawn_count(),
            hp_multiplier: 1.0,
            speed_multiplier: 1.0,
            wall_damage_multiplier: 1.0,
        }
    }
}

/// Wave file as written on disk.
#[derive(Deserialize, Clone, Debug)]
pub struct WaveTableRaw {
    #[serde(default = "default_enemy_type")]
    pub enemy_type: String,
    /// Seconds between one wave ending and the next starting.
    #[serde(default = "default_intermission")]
    pub intermission: f32,
    /// 0 means the largest wave id.
    #[serde(default)]
    pub win_wave_override: u32,
    pub waves: Vec<WaveDefinition>,
}

/// All waves by id.
#[derive(Resource, Debug, Clone)]
pub struct WaveTable {
    pub enemy_type: String,
    pub intermission: f32,
    win_wave_override: u32,
    waves: HashMap<u32, WaveDefinition>,
}

impl Default for WaveTable {
    fn default() -> Self {
        let waves = (1..=3)
            .map(|wave_id| WaveDefinition {
                wave_id,
                spawn_count: 4 + wave_id * 2,
                hp_multiplier: 1.0 + 0.25 * (wave_id - 1) as f32,
                speed_multiplier: 1.0 + 0.1 * (wave_id - 1) as f32,
                wall_damage_multiplier: 1.0 + 0.5 * (wave_id - 1) as f32,
            })
            .map(|wave| (wave.wave_id, wave))
            .collect();

        Self {
            enemy_type: default_enemy_type(),
            intermission: default_intermission(),
            win_wave_override: 0,
            waves,
        }
    }
}

impl WaveTable {
    pub fn from_raw(raw: WaveTableRaw, origin: &str) -> Result<Self, DataLoadError> {
        let invalid = |field: &'static str, details: String| DataLoadError::InvalidValue {
            path: origin.to_string(),
            field,
            details,
        };

        let mut waves = HashMap::new();
        for mut wave in raw.waves {
            if wave.wave_id == 0 {
                return Err(invalid("wave_id", "wave ids start at 1".to_string()));
            }
            if waves.contains_key(&wave.wave_id) {
                return Err(invalid("wave_id", format!("wave {} is defined twice", wave.wave_id)));
            }
            wave.hp_multiplier = wave.hp_multiplier.max(0.0);
            wave.speed_multiplier = wave.speed_multiplier.max(0.0);
            wave.wall_damage_multiplier = wave.wall_damage_multiplier.max(0.0);
            waves.insert(wave.wave_id, wave);
        }

        Ok(Self {
            enemy_type: raw.enemy_type,
            intermission: raw.intermission.max(0.0),
            win_wave_override: raw.win_wave_override,
            waves,
        })
    }

    pub fn get(&self, wave_id: u32) -> Option<&WaveDefinition> {
        self.waves.get(&wave_id)
    }

    /// The definition for `wave_id`, or the fallback wave.
    pub fn plan(&self, wave_id: u32) -> WaveDefinition {
        self.get(wave_id)
            .cloned()
            .unwrap_or_else(|| WaveDefinition::fallback(wave_id))
    }

    pub fn max_wave_id(&self) -> u32 {
        self.waves.keys().copied().max().unwrap_or(0)
    }

    /// Surviving this wave wins the game.
    pub fn win_wave_id(&self) -> u32 {
        if self.win_wave_override > 0 {
            self.win_wave_override
        } else {
            self.max_wave_id().max(1)
        }
    }
}

/// Load `assets/data/waves.ron`, keeping the built-in table on failure.
pub fn load_wave_table(mut table: ResMut<WaveTable>) {
    let path = Path::new("assets/data/waves.ron");

    let loaded = load_ron_file::<WaveTableRaw>(path)
        .and_then(|raw| WaveTable::from_raw(raw, &path.display().to_string()));

    match loaded {
        Ok(loaded) => {
            info!(
                "Loaded {} waves (win at wave {})",
                loaded.waves.len(),
                loaded.win_wave_id()
            );
            *table = loaded;
        }
        Err(DataLoadError::FileNotFound(_)) => {
            info!("No wave table, using built-in waves");
        }
        Err(e) => {
            error!("Failed to load wave table: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_ron;

    fn table(text: &str) -> Result<WaveTable, DataLoadError> {
        let raw: WaveTableRaw = parse_ron(text, "inline")?;
        WaveTable::from_raw(raw, "inline")
    }

    #[test]
    fn parses_waves_with_defaults() {
        let table = table(
            r#"(
                waves: [
                    (wave_id: 1),
                    (wave_id: 2, spawn_count: 9, speed_multiplier: 1.5),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(table.enemy_type, "zombie");
        assert_eq!(table.get(1).unwrap().spawn_count, 5);
        assert_eq!(table.get(2).unwrap().speed_multiplier, 1.5);
        assert_eq!(table.get(2).unwrap().hp_multiplier, 1.0);
        assert_eq!(table.win_wave_id(), 2);
    }

    #[test]
    fn win_wave_override_wins() {
        let table = table("(win_wave_override: 7, waves: [(wave_id: 3)])").unwrap();
        assert_eq!(table.max_wave_id(), 3);
        assert_eq!(table.win_wave_id(), 7);
    }

    #[test]
    fn empty_table_still_has_a_win_wave() {
        let table = table("(waves: [])").unwrap();
        assert_eq!(table.win_wave_id(), 1);
        assert_eq!(table.plan(4), WaveDefinition::fallback(4));
    }

    #[test]
    fn rejects_bad_wave_ids() {
        assert!(matches!(
            table("(waves: [(wave_id: 0)])"),
            Err(DataLoadError::InvalidValue { field: "wave_id", .. })
        ));
        assert!(matches!(
            table("(waves: [(wave_id: 2), (wave_id: 2)])"),
            Err(DataLoadError::InvalidValue { field: "wave_id", .. })
        ));
    }

    #[test]
    fn negative_multipliers_are_clamped() {
        let table = table("(waves: [(wave_id: 1, hp_multiplier: -2.0)])").unwrap();
        assert_eq!(table.get(1).unwrap().hp_multiplier, 0.0);
    }
}
