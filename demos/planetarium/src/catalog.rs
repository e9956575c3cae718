/// Star-system tables — one JSON document per system, embedded at compile time.
///
/// Every system shares the same shape: a central star, planets on inclined
/// ellipses, optional moons, satellites and asteroid belts, plus the camera
/// and minimap extents the navigator needs.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed system table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("body `{0}` has a non-positive orbit axis")]
    DegenerateOrbit(String),
    #[error("body `{0}` is listed more than once")]
    DuplicateBody(String),
    #[error("camera radius band [{min}, {max}] is empty")]
    EmptyRadiusBand { min: f32, max: f32 },
    #[error("`{child}` orbits unknown body `{parent}`")]
    UnknownParent { child: String, parent: String },
}

// ── System identity ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemId {
    Sol,
    Trappist1,
    Kepler90,
    Hd10180,
}

impl SystemId {
    pub const ALL: [SystemId; 4] = [SystemId::Sol, SystemId::Trappist1, SystemId::Kepler90, SystemId::Hd10180];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    fn source(self) -> &'static str {
        match self {
            SystemId::Sol => include_str!("../data/sol.json"),
            SystemId::Trappist1 => include_str!("../data/trappist1.json"),
            SystemId::Kepler90 => include_str!("../data/kepler90.json"),
            SystemId::Hd10180 => include_str!("../data/hd10180.json"),
        }
    }

    /// Parse and validate the embedded table for this system.
    pub fn load(self) -> Result<StarSystemConfig, CatalogError> {
        StarSystemConfig::from_json(self.source())
    }
}

// ── Tables ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StarSystemConfig {
    pub name: String,
    pub star: StarConfig,
    pub camera: CameraConfig,
    pub minimap: MinimapConfig,
    /// Self-rotation per tick for bodies missing from `spin_rates`.
    #[serde(default = "default_spin")]
    pub default_spin: f32,
    /// Per-body self-rotation overrides, keyed by body name.
    #[serde(default)]
    pub spin_rates: BTreeMap<String, f32>,
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub moons: Vec<MoonConfig>,
    #[serde(default)]
    pub satellites: Vec<SatelliteConfig>,
    #[serde(default)]
    pub debris: Option<DebrisConfig>,
    #[serde(default)]
    pub asteroid_belts: Vec<BeltConfig>,
    /// Simulation ticks per second. Absent means one tick per host frame.
    #[serde(default)]
    pub tick_rate: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StarConfig {
    pub name: String,
    pub size: f32,
    pub texture: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    pub default_position: [f32; 3],
    pub min_radius: f32,
    pub max_radius: f32,
}

/// Top-down overview camera and the area it covers.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimapConfig {
    pub half_width: f32,
    pub half_height: f32,
    /// Planar distance from the star the main camera may be moved to.
    pub max_distance: f32,
    pub height: f32,
    #[serde(default = "default_minimap_zoom")]
    pub zoom: f32,
    pub indicator_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub size: f32,
    pub a: f32,
    pub b: f32,
    #[serde(default)]
    pub cx: f32,
    #[serde(default)]
    pub cy: f32,
    /// Axial tilt, degrees.
    #[serde(default)]
    pub tilt: f32,
    /// Orbital inclination, degrees.
    #[serde(default)]
    pub inclination: f32,
    /// Ellipse rotation, degrees.
    #[serde(default)]
    pub omega: f32,
    /// Phase increment per tick, radians.
    pub speed: f32,
    pub focus_offset: f32,
    pub texture: String,
    #[serde(default)]
    pub atmosphere: Option<String>,
    #[serde(default)]
    pub ring: Option<RingConfig>,
    pub info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RingConfig {
    pub inner: f32,
    pub outer: f32,
    pub texture: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoonConfig {
    pub name: String,
    pub parent: String,
    pub orbit_radius: f32,
    /// Angular rate in radians per wall-clock millisecond.
    pub speed: f32,
    /// Orbit plane tilt in degrees. Absent selects the skewed diagonal orbit.
    #[serde(default)]
    pub tilt: Option<f32>,
    #[serde(default = "default_moon_spin")]
    pub spin: f32,
    pub look: MoonLook,
}

/// How a moon is drawn: a textured sphere, or a model the host streams in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonLook {
    Sphere { size: f32, texture: String },
    Model { model: String, scale: f32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub name: String,
    pub parent: String,
    pub orbit_radius: f32,
    /// Phase increment per tick, radians.
    pub speed: f32,
    #[serde(default)]
    pub start_angle: f32,
    /// Orbit plane tilt, radians.
    #[serde(default = "default_satellite_tilt")]
    pub tilt: f32,
    pub size: f32,
    #[serde(default)]
    pub blink_rate: Option<f32>,
    #[serde(default = "default_tumble")]
    pub tumble: f32,
}

/// A cloud of small rocks around one body, generated from a seed.
#[derive(Debug, Clone, Deserialize)]
pub struct DebrisConfig {
    pub parent: String,
    pub count: u32,
    pub seed: u32,
    pub orbit_radius: [f32; 2],
    pub speed: [f32; 2],
    pub size: [f32; 2],
    pub max_tumble: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeltConfig {
    pub model: String,
    pub count: u32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub seed: u32,
}

fn default_spin() -> f32 {
    0.005
}

fn default_moon_spin() -> f32 {
    0.01
}

fn default_minimap_zoom() -> f32 {
    1.5
}

fn default_satellite_tilt() -> f32 {
    0.3
}

fn default_tumble() -> f32 {
    0.01
}

impl StarSystemConfig {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let (min, max) = (self.camera.min_radius, self.camera.max_radius);
        if !(min > 0.0 && min <= max) {
            return Err(CatalogError::EmptyRadiusBand { min, max });
        }

        let mut names = HashSet::new();
        for body in &self.bodies {
            if !(body.a > 0.0 && body.b > 0.0) {
                return Err(CatalogError::DegenerateOrbit(body.name.clone()));
            }
            if !names.insert(body.name.as_str()) {
                return Err(CatalogError::DuplicateBody(body.name.clone()));
            }
        }

        let parents = self
            .moons
            .iter()
            .map(|m| (&m.name, &m.parent))
            .chain(self.satellites.iter().map(|s| (&s.name, &s.parent)))
            .chain(self.debris.iter().map(|d| (&d.parent, &d.parent)));
        for (child, parent) in parents {
            if !names.contains(parent.as_str()) {
                return Err(CatalogError::UnknownParent { child: child.clone(), parent: parent.clone() });
            }
        }
        Ok(())
    }

    /// Self-rotation per tick for the named body.
    pub fn spin_for(&self, name: &str) -> f32 {
        self.spin_rates.get(name).copied().unwrap_or(self.default_spin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "Test",
        "star": { "name": "Star", "size": 10.0, "texture": "sun" },
        "camera": { "default_position": [-50.0, 30.0, 5.0], "min_radius": 20.0, "max_radius": 200.0 },
        "minimap": { "half_width": 100.0, "half_height": 50.0, "max_distance": 100.0,
                     "height": 200.0, "indicator_radius": 2.0 },
        "spin_rates": { "B": 0.033 },
        "bodies": [
            { "name": "B", "size": 6.7, "a": 30.0, "b": 30.0, "speed": 0.001,
              "focus_offset": 25.0, "texture": "b", "info": "first" },
            { "name": "C", "size": 6.5, "a": 45.0, "b": 45.0, "speed": 0.0008,
              "focus_offset": 25.0, "texture": "c", "info": "second" }
        ],
        "moons": [
            { "name": "m", "parent": "C", "orbit_radius": 10.0, "speed": 0.001,
              "look": { "sphere": { "size": 1.0, "texture": "moon" } } }
        ]
    }"#;

    #[test]
    fn parses_with_defaults() {
        let c = StarSystemConfig::from_json(MINIMAL).unwrap();
        assert_eq!(c.bodies.len(), 2);
        assert_eq!(c.minimap.zoom, 1.5);
        assert_eq!(c.spin_for("B"), 0.033);
        assert_eq!(c.spin_for("C"), 0.005);
        assert_eq!(c.moons[0].spin, 0.01);
        assert!(c.moons[0].tilt.is_none());
        assert!(c.tick_rate.is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let json = MINIMAL.replace("\"name\": \"C\"", "\"name\": \"B\"");
        let err = StarSystemConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateBody(ref n) if n == "B"));
    }

    #[test]
    fn rejects_degenerate_orbit() {
        let json = MINIMAL.replace("\"a\": 45.0", "\"a\": 0.0");
        let err = StarSystemConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::DegenerateOrbit(_)));
    }

    #[test]
    fn rejects_orphan_moon() {
        let json = MINIMAL.replace("\"parent\": \"C\"", "\"parent\": \"Z\"");
        let err = StarSystemConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownParent { .. }));
    }

    #[test]
    fn rejects_inverted_radius_band() {
        let json = MINIMAL.replace("\"max_radius\": 200.0", "\"max_radius\": 10.0");
        let err = StarSystemConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyRadiusBand { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = StarSystemConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn embedded_systems_load() {
        for id in SystemId::ALL {
            let config = id.load().unwrap_or_else(|e| panic!("{id:?}: {e}"));
            assert!(!config.bodies.is_empty());
        }
        assert_eq!(SystemId::Sol.load().unwrap().bodies.len(), 9);
        assert_eq!(SystemId::Trappist1.load().unwrap().bodies.len(), 7);
        assert_eq!(SystemId::Kepler90.load().unwrap().bodies.len(), 8);
        assert_eq!(SystemId::Hd10180.load().unwrap().bodies.len(), 6);
    }

    #[test]
    fn system_index_round_trips() {
        for id in SystemId::ALL {
            assert_eq!(SystemId::from_index(id.index()), Some(id));
        }
        assert_eq!(SystemId::from_index(4), None);
    }
}
