//! Deterministic match core
//!
//! All arena and match logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Stable iteration order (registry insertion order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod rescue;
pub mod tile;

pub use clock::{ClockReading, MatchClock};
pub use rescue::{RescueMatch, SpawnSpec, StartupError, build_match};
pub use tile::{
    ObjectDescriptor, TileLoadError, TileSearchPath, TileSpec, assemble_tile, assemble_tiles,
};
