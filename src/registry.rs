//! Keyed object store shared with the surrounding engine
//!
//! The engine owns object instantiation and storage; the match core is a
//! pure client. It submits descriptor batches via [`ObjectRegistry::load_elements`]
//! and looks objects up by exact key or key prefix. Iteration order is
//! insertion order so prefix scans stay deterministic across runs.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::sim::tile::ObjectDescriptor;

/// Physics body state of a placed object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// World-space position
    pub position: Vec2,
    /// Orientation in radians
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
        }
    }
}

impl Body {
    /// Body at rest at the given pose
    pub fn at(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            angle,
            ..Self::default()
        }
    }
}

/// Behavior hook attached to a robot's root object
pub trait RobotBehavior {
    /// Called once the robot has been placed at its spawn slot
    fn on_spawn(&mut self);
}

/// One object known to the engine
pub struct SimObject {
    /// Globally unique registry key
    pub key: String,
    pub body: Body,
    /// Draw/stacking order
    pub z_pos: f32,
    /// Whether robot sensors can see this object
    pub sensor_visible: bool,
    /// Text payload, present on display objects such as the countdown timer
    pub text: Option<String>,
    /// Robot hook, present only on robot root objects
    pub behavior: Option<Box<dyn RobotBehavior>>,
}

impl SimObject {
    /// Create an object at rest at the origin
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: Body::default(),
            z_pos: 0.0,
            sensor_visible: false,
            text: None,
            behavior: None,
        }
    }

    /// Attach a robot behavior hook
    pub fn with_behavior(mut self, behavior: Box<dyn RobotBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Mark this object as a text display
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl fmt::Debug for SimObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimObject")
            .field("key", &self.key)
            .field("body", &self.body)
            .field("z_pos", &self.z_pos)
            .field("sensor_visible", &self.sensor_visible)
            .field("text", &self.text)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

/// Registry of all objects known to the engine
#[derive(Debug)]
pub struct ObjectRegistry {
    objects: HashMap<String, SimObject>,
    /// Insertion order of keys, for stable iteration
    order: Vec<String>,
    /// Fixed simulation tick rate, ticks per second
    pub ticks_per_second: u32,
}

impl ObjectRegistry {
    /// Create an empty registry driven at the given tick rate
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            ticks_per_second,
        }
    }

    /// Insert a fully built object. An existing object under the same key
    /// is replaced and keeps its original position in iteration order.
    pub fn insert(&mut self, object: SimObject) {
        let key = object.key.clone();
        if self.objects.insert(key.clone(), object).is_some() {
            log::warn!("replacing existing object '{key}'");
        } else {
            self.order.push(key);
        }
    }

    /// Instantiate a batch of assembled descriptors, in batch order.
    pub fn load_elements(&mut self, batch: Vec<ObjectDescriptor>) {
        for desc in batch {
            let object = SimObject {
                key: desc.key.clone(),
                body: Body::at(desc.position, desc.rotation),
                z_pos: desc.z_pos,
                sensor_visible: desc.sensor_visible,
                text: None,
                behavior: None,
            };
            self.insert(object);
        }
    }

    /// Look up an object by exact key
    pub fn get(&self, key: &str) -> Option<&SimObject> {
        self.objects.get(key)
    }

    /// Mutable lookup by exact key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut SimObject> {
        self.objects.get_mut(key)
    }

    /// All keys, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Keys starting with `prefix`, in insertion order
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.keys().filter(move |k| k.starts_with(prefix))
    }

    /// Number of objects currently registered
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
