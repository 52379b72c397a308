//! Robot discovery and match lifecycle
//!
//! [`RescueMatch`] orchestrates a match on top of an already-assembled
//! field: it discovers the robot objects the engine loaded, validates them
//! against the configured spawn slots, seeds their bodies, and drives the
//! countdown every simulation tick. Startup is fail-fast: a missing robot
//! or a spawn shortfall aborts the whole match before any body is touched.

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::config::RescuePreset;
use crate::consts::{DEFAULT_TICK_RATE, TILE_LENGTH, TIMER_TEXT_KEY};
use crate::registry::ObjectRegistry;
use crate::sim::clock::MatchClock;
use crate::sim::tile::{TileLoadError, TileSearchPath, assemble_tiles};

/// Build the field and its match controller from one preset.
///
/// Assembles every configured tile into the registry, then readies the
/// controller with the preset's spawn slots. Robots are loaded by the
/// engine separately; call [`RescueMatch::start_up`] once they are in.
pub fn build_match(
    preset: &RescuePreset,
    search: &TileSearchPath,
    registry: &mut ObjectRegistry,
) -> Result<RescueMatch, TileLoadError> {
    assemble_tiles(&preset.tiles, search, registry)?;
    Ok(RescueMatch::new(preset.spawns.clone()))
}

/// Starting pose for one robot, assigned by ordinal
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpawnSpec {
    /// Grid position, in tile units
    pub position: Vec2,
    /// Heading in degrees
    #[serde(default)]
    pub heading: f32,
}

/// Errors that abort match startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    /// No `Robot-<index>` keys were found in the registry.
    #[error("no robots loaded")]
    NoRobots,

    /// More robots were discovered than spawn slots configured.
    #[error("not enough spawn locations: {robots} robots, {spawns} spawns")]
    InsufficientSpawns { robots: usize, spawns: usize },
}

/// Match controller: discovers robots, seeds their spawn poses, tracks
/// per-robot scores, and drives the countdown clock.
#[derive(Debug)]
pub struct RescueMatch {
    spawns: Vec<SpawnSpec>,
    /// Registry keys of robot root objects, by ordinal
    robots: Vec<String>,
    /// Score slots, index-aligned with `robots`
    scores: Vec<f32>,
    clock: MatchClock,
    timer_key: String,
    cur_tick: u64,
}

impl RescueMatch {
    pub fn new(spawns: Vec<SpawnSpec>) -> Self {
        Self {
            spawns,
            robots: Vec::new(),
            scores: Vec::new(),
            clock: MatchClock::new(DEFAULT_TICK_RATE),
            timer_key: TIMER_TEXT_KEY.to_string(),
            cur_tick: 0,
        }
    }

    /// Use a different display object for the countdown
    pub fn with_timer_key(mut self, key: impl Into<String>) -> Self {
        self.timer_key = key.into();
        self
    }

    /// Robot registry keys in ordinal order (empty before startup)
    pub fn robots(&self) -> &[String] {
        &self.robots
    }

    /// Per-robot score slots
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Credit (or debit) one robot's score slot
    pub fn add_score(&mut self, robot: usize, amount: f32) {
        if let Some(slot) = self.scores.get_mut(robot) {
            *slot += amount;
        }
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    /// Last tick number handed in by the engine
    pub fn cur_tick(&self) -> u64 {
        self.cur_tick
    }

    /// Scan the registry for robot root objects.
    ///
    /// Robot indices are contiguous from 0; the scan stops at the first
    /// index with no matching key. A robot's root object shares its
    /// `Robot-<index>` key prefix with its sub-component objects; the
    /// shortest key is the root, ties broken by registry insertion order.
    pub fn locate_robots(registry: &ObjectRegistry) -> Vec<String> {
        let mut robots = Vec::new();
        for index in 0.. {
            let prefix = format!("Robot-{index}");
            let mut candidates: Vec<&str> = registry.keys_with_prefix(&prefix).collect();
            if candidates.is_empty() {
                break;
            }
            candidates.sort_by_key(|k| k.len());
            robots.push(candidates[0].to_string());
        }
        robots
    }

    /// Bring the match to its ready state.
    ///
    /// Discovers robots, validates spawn capacity, zeroes scores, seeds
    /// every robot body at its spawn slot, then fires each robot's
    /// `on_spawn` hook in ordinal order. On failure no robot body has been
    /// touched. Adopts the engine tick rate for the countdown.
    pub fn start_up(&mut self, registry: &mut ObjectRegistry) -> Result<(), StartupError> {
        let robots = Self::locate_robots(registry);
        if robots.is_empty() {
            return Err(StartupError::NoRobots);
        }
        if robots.len() > self.spawns.len() {
            return Err(StartupError::InsufficientSpawns {
                robots: robots.len(),
                spawns: self.spawns.len(),
            });
        }

        log::info!(
            "match start: {} robots, {} spawn slots",
            robots.len(),
            self.spawns.len()
        );
        self.scores = vec![0.0; robots.len()];
        self.robots = robots;
        self.clock = MatchClock::new(registry.ticks_per_second);

        self.reset_positions(registry);

        for key in &self.robots {
            if let Some(behavior) = registry.get_mut(key).and_then(|o| o.behavior.as_mut()) {
                behavior.on_spawn();
            }
        }
        Ok(())
    }

    /// Seed every robot body from its spawn slot: position scaled into
    /// world units, heading in radians, velocities zeroed. Idempotent.
    pub fn reset_positions(&self, registry: &mut ObjectRegistry) {
        for (i, key) in self.robots.iter().enumerate() {
            let spawn = &self.spawns[i];
            if let Some(obj) = registry.get_mut(key) {
                obj.body.position = spawn.position * TILE_LENGTH;
                obj.body.angle = spawn.heading.to_radians();
                obj.body.velocity = Vec2::ZERO;
                obj.body.angular_velocity = 0.0;
            }
        }
    }

    /// Run one simulation tick.
    ///
    /// While the engine reports paused the countdown is fully suspended:
    /// no counter advance and no display update.
    pub fn tick(&mut self, tick: u64, paused: bool, registry: &mut ObjectRegistry) {
        self.cur_tick = tick;
        if paused {
            return;
        }
        let reading = self.clock.advance();
        if let Some(display) = registry.get_mut(&self.timer_key) {
            display.text = Some(reading.format_mmss());
        }
    }
}
