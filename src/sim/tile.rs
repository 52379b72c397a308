//! Tile templates and field assembly
//!
//! A rescue field is composed from reusable tile templates: YAML documents
//! holding an ordered list of object descriptors in tile-local coordinates.
//! Assembly rewrites each descriptor into the world frame, namespaces its
//! key, appends a boundary outline, and submits the batch to the object
//! registry. Assembly runs once, at construction time, before the match
//! loop starts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::consts::{OUTLINE_STROKE_COLOR, OUTLINE_STROKE_WIDTH, OUTLINE_Z_OFFSET, TILE_LENGTH};
use crate::local_to_world;
use crate::registry::ObjectRegistry;

/// Errors raised while loading or assembling tile templates.
///
/// Any single tile failure aborts the whole field; there is no
/// partial-tile fallback.
#[derive(Debug, Error)]
pub enum TileLoadError {
    /// The template path did not resolve in any search location.
    #[error("tile template '{path}' not found in any search location")]
    NotFound { path: String },

    /// The resolved template file could not be read.
    #[error("failed to read tile template '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The template content is not a valid descriptor list.
    #[error("failed to parse tile template '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The template holds no objects. Outline keys derive from the last
    /// content object, so empty templates are rejected.
    #[error("tile template '{path}' contains no objects")]
    Empty { path: String },
}

/// Placement of one tile within the field grid
#[derive(Debug, Clone, Deserialize)]
pub struct TileSpec {
    /// Template path, resolved through the tile search locations
    pub path: String,
    /// Grid position, in tile units
    #[serde(default)]
    pub position: Vec2,
    /// Tile rotation in degrees
    #[serde(default)]
    pub rotation: f32,
}

/// One entry of a tile template.
///
/// `position` and `rotation` are tile-local (degrees) as parsed, and
/// world-frame (radians) after assembly. Fields the match core does not
/// interpret are kept verbatim in `extra` for the instantiating engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectDescriptor {
    pub key: String,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, rename = "zPos")]
    pub z_pos: f32,
    #[serde(default, rename = "sensorVisible")]
    pub sensor_visible: bool,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Ordered search locations for template paths.
///
/// Mirrors the engine's layered lookup: user-local override directories
/// are consulted before packaged defaults, first hit wins. Absolute paths
/// that exist are used as-is.
#[derive(Debug, Clone)]
pub struct TileSearchPath {
    roots: Vec<PathBuf>,
}

impl Default for TileSearchPath {
    fn default() -> Self {
        Self::new(vec!["presets/tiles".into(), "presets".into(), ".".into()])
    }
}

impl TileSearchPath {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Resolve a template path against the search roots.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, TileLoadError> {
        let direct = Path::new(path);
        if direct.is_absolute() && direct.exists() {
            return Ok(direct.to_path_buf());
        }
        for root in &self.roots {
            let candidate = root.join(path);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(TileLoadError::NotFound {
            path: path.to_string(),
        })
    }
}

/// Load and parse one tile template file.
pub fn load_template(path: &Path) -> Result<Vec<ObjectDescriptor>, TileLoadError> {
    let text = fs::read_to_string(path).map_err(|source| TileLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_template(&text, &path.display().to_string())
}

/// Parse a tile template from YAML text. `path` is used for error context.
pub fn parse_template(text: &str, path: &str) -> Result<Vec<ObjectDescriptor>, TileLoadError> {
    let objects: Vec<ObjectDescriptor> =
        serde_yaml::from_str(text).map_err(|source| TileLoadError::Parse {
            path: path.to_string(),
            source,
        })?;
    if objects.is_empty() {
        return Err(TileLoadError::Empty {
            path: path.to_string(),
        });
    }
    Ok(objects)
}

/// Assemble every tile into world space and submit the batches to the
/// registry.
///
/// Tiles are processed in list order; the tile at list position `i` owns
/// the key namespace `Tile-{i}-`.
pub fn assemble_tiles(
    tiles: &[TileSpec],
    search: &TileSearchPath,
    registry: &mut ObjectRegistry,
) -> Result<(), TileLoadError> {
    for (index, tile) in tiles.iter().enumerate() {
        let path = search.resolve(&tile.path)?;
        let template = load_template(&path)?;
        let batch = assemble_tile(index, tile, template);
        log::info!(
            "tile {index} '{}' at {:?}: {} objects",
            tile.path,
            tile.position,
            batch.len()
        );
        registry.load_elements(batch);
    }
    Ok(())
}

/// Rewrite one parsed template into world space and append its outline.
///
/// Each object's rotation composes additively with the tile rotation (both
/// in degrees, converted to radians once). The tile transform places the
/// object's origin; the object's own rotation affects only its
/// orientation, not its offset from the tile origin. All tile content
/// becomes sensor-visible. The outline square sits one layer above the
/// tile's highest content object and is keyed off the last content
/// object's original key; templates are non-empty by the time they reach
/// this point.
pub fn assemble_tile(
    index: usize,
    tile: &TileSpec,
    mut objects: Vec<ObjectDescriptor>,
) -> Vec<ObjectDescriptor> {
    debug_assert!(!objects.is_empty());

    let origin = tile.position * TILE_LENGTH;
    let tile_rotation = tile.rotation.to_radians();

    let mut max_z = 0.0f32;
    let mut last_key = String::new();
    for obj in &mut objects {
        obj.rotation = (obj.rotation + tile.rotation).to_radians();
        obj.position = local_to_world(obj.position, tile_rotation, origin);
        obj.sensor_visible = true;
        last_key = std::mem::take(&mut obj.key);
        obj.key = format!("Tile-{index}-{last_key}");
        max_z = max_z.max(obj.z_pos);
    }

    objects.push(ObjectDescriptor {
        key: format!("Tile-{index}-{last_key}-outline"),
        position: local_to_world(Vec2::ZERO, tile_rotation, origin),
        rotation: tile_rotation,
        z_pos: max_z + OUTLINE_Z_OFFSET,
        object_type: Some("visual".to_string()),
        name: Some("Rectangle".to_string()),
        width: Some(TILE_LENGTH),
        height: Some(TILE_LENGTH),
        stroke: Some(OUTLINE_STROKE_COLOR.to_string()),
        stroke_width: Some(OUTLINE_STROKE_WIDTH),
        ..Default::default()
    });
    objects
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_OBJECT: &str = "\
- key: mat
  position: [0.0, 0.0]
";

    const LINE_TILE: &str = "\
- key: mat
  type: visual
  name: Rectangle
  width: 30.0
  height: 30.0
  fill: white
  zPos: 0.5
- key: line
  type: visual
  name: Line
  position: [0.0, 5.0]
  rotation: 45.0
  zPos: 1.0
";

    fn tile_at(x: f32, y: f32, rotation: f32) -> TileSpec {
        TileSpec {
            path: "test.yaml".to_string(),
            position: Vec2::new(x, y),
            rotation,
        }
    }

    #[test]
    fn test_parse_defaults() {
        let objects = parse_template(SINGLE_OBJECT, "test.yaml").unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, "mat");
        assert_eq!(objects[0].rotation, 0.0);
        assert_eq!(objects[0].z_pos, 0.0);
        assert!(!objects[0].sensor_visible);
    }

    #[test]
    fn test_parse_rejects_empty_template() {
        let err = parse_template("[]", "empty.yaml").unwrap_err();
        assert!(matches!(err, TileLoadError::Empty { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        let err = parse_template("not: [a, list", "bad.yaml").unwrap_err();
        assert!(matches!(err, TileLoadError::Parse { .. }));
    }

    #[test]
    fn test_assemble_places_object_in_world_space() {
        let objects = parse_template(SINGLE_OBJECT, "test.yaml").unwrap();
        let batch = assemble_tile(0, &tile_at(2.0, 1.0, 0.0), objects);

        // Content object plus the outline.
        assert_eq!(batch.len(), 2);
        let obj = &batch[0];
        assert_eq!(obj.key, "Tile-0-mat");
        assert!((obj.position - Vec2::new(60.0, 30.0)).length() < 1e-4);
        assert!(obj.sensor_visible);
    }

    #[test]
    fn test_assemble_composes_rotations() {
        let objects = parse_template(LINE_TILE, "test.yaml").unwrap();
        let batch = assemble_tile(3, &tile_at(0.0, 0.0, 90.0), objects);

        // Object rotation (45°) composes with the tile rotation (90°).
        let line = &batch[1];
        assert_eq!(line.key, "Tile-3-line");
        assert!((line.rotation - 135.0_f32.to_radians()).abs() < 1e-5);
        // Local (0, 5) rotated a quarter turn lands on (-5, 0).
        assert!((line.position - Vec2::new(-5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_outline_stacks_above_content() {
        let objects = parse_template(LINE_TILE, "test.yaml").unwrap();
        let batch = assemble_tile(0, &tile_at(1.0, 0.0, 0.0), objects);

        let outline = batch.last().unwrap();
        assert_eq!(outline.key, "Tile-0-line-outline");
        assert!(!outline.sensor_visible);
        assert!((outline.position - Vec2::new(30.0, 0.0)).length() < 1e-4);
        for obj in &batch[..batch.len() - 1] {
            assert!(outline.z_pos > obj.z_pos);
        }
    }

    #[test]
    fn test_assemble_tiles_one_outline_per_tile() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("presets/tiles");
        let search = TileSearchPath::new(vec![dir]);
        let tiles = vec![
            TileSpec {
                path: "straight.yaml".to_string(),
                position: Vec2::ZERO,
                rotation: 0.0,
            },
            TileSpec {
                path: "corner.yaml".to_string(),
                position: Vec2::new(1.0, 0.0),
                rotation: 90.0,
            },
        ];
        let mut registry = ObjectRegistry::new(30);
        assemble_tiles(&tiles, &search, &mut registry).unwrap();

        let outlines: Vec<&str> = registry
            .keys()
            .filter(|k| k.ends_with("-outline"))
            .collect();
        assert_eq!(outlines.len(), 2);
        assert!(outlines[0].starts_with("Tile-0-"));
        assert!(outlines[1].starts_with("Tile-1-"));
    }

    #[test]
    fn test_resolve_finds_template_in_roots() {
        let base = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let search = TileSearchPath::new(vec![base.join("presets/tiles"), base.join("presets")]);
        let found = search.resolve("straight.yaml").unwrap();
        assert!(found.ends_with("presets/tiles/straight.yaml"));
    }

    #[test]
    fn test_resolve_missing_path() {
        let search = TileSearchPath::default();
        let err = search.resolve("no-such-tile.yaml").unwrap_err();
        assert!(matches!(err, TileLoadError::NotFound { .. }));
    }
}
