//! Match presets
//!
//! A preset is one YAML document describing a full match setup: the tile
//! list composing the field, the spawn slots, and the simulation tick
//! rate. Presets are loaded once, before construction-time assembly.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::consts::DEFAULT_TICK_RATE;
use crate::sim::rescue::SpawnSpec;
use crate::sim::tile::TileSpec;

/// Errors raised by the preset loader
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read preset '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preset '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Full match setup
#[derive(Debug, Clone, Deserialize)]
pub struct RescuePreset {
    /// Tiles composing the field, in assembly order
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    /// Spawn slots, one per expected robot
    #[serde(default)]
    pub spawns: Vec<SpawnSpec>,
    /// Simulation tick rate, ticks per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
}

fn default_tick_rate() -> u32 {
    DEFAULT_TICK_RATE
}

/// Load a preset document from disk
pub fn load_preset(path: &Path) -> Result<RescuePreset, PresetError> {
    let text = std::fs::read_to_string(path).map_err(|source| PresetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| PresetError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_parse_preset() {
        let preset: RescuePreset = serde_yaml::from_str(
            "\
tiles:
  - path: straight.yaml
    position: [0.0, 0.0]
  - path: corner.yaml
    position: [1.0, 0.0]
    rotation: 90.0
spawns:
  - position: [0.0, 0.0]
    heading: 90.0
",
        )
        .unwrap();

        assert_eq!(preset.tiles.len(), 2);
        assert_eq!(preset.tiles[1].rotation, 90.0);
        assert_eq!(preset.spawns.len(), 1);
        assert_eq!(preset.spawns[0].position, Vec2::ZERO);
        assert_eq!(preset.tick_rate, DEFAULT_TICK_RATE);
    }

    #[test]
    fn test_load_shipped_preset() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("presets/rescue.yaml");
        let preset = load_preset(&path).unwrap();
        assert!(!preset.tiles.is_empty());
        assert!(!preset.spawns.is_empty());
        assert!(preset.tick_rate > 0);
    }

    #[test]
    fn test_missing_preset_is_io_error() {
        let err = load_preset(Path::new("no-such-preset.yaml")).unwrap_err();
        assert!(matches!(err, PresetError::Io { .. }));
    }
}
