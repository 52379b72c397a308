//! Rescue Arena - tile-based robot rescue field and match core
//!
//! Core modules:
//! - `sim`: Deterministic match logic (tile assembly, robot lifecycle, clock)
//! - `registry`: Keyed object store shared with the surrounding engine
//! - `config`: Data-driven match presets (tiles, spawns, tick rate)

pub mod config;
pub mod registry;
pub mod sim;

pub use config::{RescuePreset, load_preset};
pub use registry::{Body, ObjectRegistry, RobotBehavior, SimObject};

use glam::Vec2;

/// Arena configuration constants
pub mod consts {
    /// Edge length of one field tile, in world units
    pub const TILE_LENGTH: f32 = 30.0;
    /// Match length (5 minute countdown)
    pub const MATCH_LENGTH_SECS: f32 = 300.0;
    /// Default simulation tick rate when no preset overrides it
    pub const DEFAULT_TICK_RATE: u32 = 30;

    /// Registry key of the countdown display object
    pub const TIMER_TEXT_KEY: &str = "TimerText";

    /// Tile outline styling
    pub const OUTLINE_STROKE_WIDTH: f32 = 0.1;
    pub const OUTLINE_STROKE_COLOR: &str = "rescue_outline_color";
    /// Outlines stack one layer above the tile's highest content object
    pub const OUTLINE_Z_OFFSET: f32 = 0.1;
}

/// Map a point from a tile's local frame into the world frame.
///
/// Rotates counter-clockwise by `rotation` (radians), then translates by
/// `origin`.
#[inline]
pub fn local_to_world(point: Vec2, rotation: f32, origin: Vec2) -> Vec2 {
    Vec2::from_angle(rotation).rotate(point) + origin
}

/// Inverse of [`local_to_world`]: map a world-frame point back into the
/// tile frame described by `rotation`/`origin`.
#[inline]
pub fn world_to_local(point: Vec2, rotation: f32, origin: Vec2) -> Vec2 {
    Vec2::from_angle(-rotation).rotate(point - origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_rotation_is_translation() {
        let p = Vec2::new(3.0, -4.0);
        let origin = Vec2::new(10.0, 20.0);
        let w = local_to_world(p, 0.0, origin);
        assert!((w - (p + origin)).length() < 1e-6);
    }

    #[test]
    fn test_quarter_turn() {
        // (1, 0) rotated 90° CCW lands on (0, 1)
        let w = local_to_world(Vec2::X, FRAC_PI_2, Vec2::ZERO);
        assert!((w - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_world_to_local_inverts() {
        let p = Vec2::new(7.5, -2.25);
        let origin = Vec2::new(-30.0, 60.0);
        let rot = 0.7;
        let back = world_to_local(local_to_world(p, rot, origin), rot, origin);
        assert!((back - p).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_zero_rotation_translates(
            px in -1000.0f32..1000.0, py in -1000.0f32..1000.0,
            ox in -1000.0f32..1000.0, oy in -1000.0f32..1000.0,
        ) {
            let w = local_to_world(Vec2::new(px, py), 0.0, Vec2::new(ox, oy));
            prop_assert!((w - Vec2::new(px + ox, py + oy)).length() < 1e-3);
        }

        #[test]
        fn prop_pure_rotation_preserves_length(
            px in -1000.0f32..1000.0, py in -1000.0f32..1000.0,
            rot in -PI..PI,
        ) {
            let p = Vec2::new(px, py);
            let w = local_to_world(p, rot, Vec2::ZERO);
            prop_assert!((w.length() - p.length()).abs() < 1e-2);
        }
    }
}
