/// Decorations that ride along with the planets: natural moons, artificial
/// satellites, orbiting debris, and the star-centred asteroid belts.
///
/// None of these are pickable. Moons follow wall-clock time, satellites and
/// belts follow the orbit multiplier.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};
use orrery_engine::{MeshInstance, RenderBuffer, Scene, TransformGraph, EntityId};

use crate::catalog::{BeltConfig, DebrisConfig, MoonConfig, SatelliteConfig};
use crate::orbit;
use crate::settings::GlobalSettings;

/// Whole-belt drift about the star per tick, before the orbit multiplier.
pub const BELT_DRIFT: f32 = 0.0001;
/// Self-rotation of each asteroid per tick.
pub const ASTEROID_SPIN: f32 = 0.0001;
/// Asteroid scale jitter.
const ASTEROID_SCALE: (f32, f32) = (0.8, 1.2);

// ── Deterministic scatter ────────────────────────────────────────────

/// Integer hash for seeded placement.
pub fn scatter_hash(x: u32) -> u32 {
    let mut h = x.wrapping_mul(2654435761);
    h ^= h >> 16;
    h = h.wrapping_mul(2246822519);
    h ^= h >> 13;
    h
}

/// Uniform value in `[0, 1)` for element `index` of a seeded set. `channel`
/// separates independent draws for the same element.
fn unit(seed: u32, index: u32, channel: u32) -> f32 {
    let h = scatter_hash(seed ^ scatter_hash(index.wrapping_mul(31).wrapping_add(channel)));
    (h >> 8) as f32 / (1u32 << 24) as f32
}

fn between(range: [f32; 2], t: f32) -> f32 {
    range[0] + (range[1] - range[0]) * t
}

// ── Moons ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Moon {
    pub name: String,
    pub orbit_radius: f32,
    /// Radians per wall-clock millisecond.
    pub speed: f32,
    /// Orbit plane tilt, radians. `None` selects the skewed diagonal orbit.
    pub tilt: Option<f32>,
    pub spin: f32,
    pub spin_angle: f32,
    /// Absent until the mesh exists; model-backed moons wait for their asset.
    pub entity: Option<EntityId>,
}

impl Moon {
    pub fn from_config(config: &MoonConfig) -> Self {
        Self {
            name: config.name.clone(),
            orbit_radius: config.orbit_radius,
            speed: config.speed,
            tilt: config.tilt.map(f32::to_radians),
            spin: config.spin,
            spin_angle: 0.0,
            entity: None,
        }
    }

    /// Offset from the parent at `elapsed_ms` of wall-clock time.
    pub fn position_at(&self, elapsed_ms: f64) -> Vec3 {
        // Reduce in f64 so long sessions keep full f32 precision.
        let angle = (elapsed_ms * self.speed as f64).rem_euclid(std::f64::consts::TAU) as f32;
        match self.tilt {
            Some(k) => orbit::tilted_circle(self.orbit_radius, angle, k),
            None => orbit::skewed_circle(self.orbit_radius, angle),
        }
    }

    /// Spin one tick and place the moon. Skipped while detached.
    pub fn update(&mut self, elapsed_ms: f64, graph: &mut TransformGraph) {
        let Some(entity) = self.entity else { return };
        self.spin_angle += self.spin;
        let offset = self.position_at(elapsed_ms);
        if let Some(local) = graph.get_local_mut(entity) {
            local.offset = offset;
            local.rotation = Quat::from_rotation_y(self.spin_angle);
        }
    }
}

// ── Satellites and debris ────────────────────────────────────────────

/// Rotation that points local +Z from `position` at the parent's origin.
fn facing_origin(position: Vec3) -> Quat {
    let toward = -position.normalize_or_zero();
    if toward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Z, toward)
}

/// Beacon light phase: climbs by `rate` per tick, restarts past π.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    pub time: f32,
    pub rate: f32,
}

impl Blink {
    pub fn new(rate: f32) -> Self {
        Self { time: 0.0, rate }
    }

    pub fn tick(&mut self) {
        self.time += self.rate;
        if self.time > PI {
            self.time = 0.0;
        }
    }

    pub fn intensity(&self) -> f32 {
        0.5 + 0.5 * self.time.sin()
    }
}

#[derive(Debug, Clone)]
pub struct Satellite {
    pub orbit_radius: f32,
    /// Radians per tick before the orbit multiplier.
    pub speed: f32,
    pub angle: f32,
    /// Orbit plane tilt, radians.
    pub tilt: f32,
    pub tumble_axis: Vec3,
    pub tumble: f32,
    pub orientation: Quat,
    /// Multi-part craft turn toward their planet every tick before tumbling.
    pub faces_parent: bool,
    pub blink: Option<Blink>,
    pub entity: EntityId,
}

impl Satellite {
    pub fn from_config(config: &SatelliteConfig, entity: EntityId) -> Self {
        Self {
            orbit_radius: config.orbit_radius,
            speed: config.speed,
            angle: config.start_angle,
            tilt: config.tilt,
            tumble_axis: Vec3::Y,
            tumble: config.tumble,
            orientation: Quat::IDENTITY,
            faces_parent: true,
            blink: config.blink_rate.map(Blink::new),
            entity,
        }
    }

    /// A satellite on one generated debris orbit.
    pub fn from_debris(spec: &DebrisSpec, entity: EntityId) -> Self {
        Self {
            orbit_radius: spec.orbit_radius,
            speed: spec.speed,
            angle: spec.angle,
            tilt: 0.3,
            tumble_axis: spec.tumble_axis,
            tumble: spec.tumble,
            orientation: Quat::IDENTITY,
            faces_parent: false,
            blink: None,
            entity,
        }
    }

    pub fn position(&self) -> Vec3 {
        orbit::tilted_circle(self.orbit_radius, self.angle, self.tilt)
    }

    pub fn tick(&mut self, settings: &GlobalSettings) {
        self.angle = orbit::advance(self.angle, self.speed, settings.orbit_speed_multiplier);
        let spin = Quat::from_axis_angle(self.tumble_axis, self.tumble);
        self.orientation = if self.faces_parent {
            facing_origin(self.position()) * spin
        } else {
            (self.orientation * spin).normalize()
        };
        if let Some(blink) = &mut self.blink {
            blink.tick();
        }
    }

    /// Write position, orientation and beacon glow into the scene.
    pub fn apply(&self, graph: &mut TransformGraph, scene: &mut Scene) {
        if let Some(local) = graph.get_local_mut(self.entity) {
            local.offset = self.position();
            local.rotation = self.orientation;
        }
        if let Some(blink) = &self.blink {
            if let Some(mesh) = scene.get_mut(self.entity).and_then(|e| e.mesh.as_mut()) {
                mesh.emissive = blink.intensity();
            }
        }
    }
}

/// One generated rock of a debris cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisSpec {
    pub size: f32,
    pub orbit_radius: f32,
    pub angle: f32,
    pub speed: f32,
    pub tumble_axis: Vec3,
    pub tumble: f32,
    /// Grey-brown shade, linear RGB.
    pub shade: [f32; 3],
}

/// Reproducible debris cloud for `config`.
pub fn scatter_debris(config: &DebrisConfig) -> Vec<DebrisSpec> {
    (0..config.count)
        .map(|i| {
            let u = |channel| unit(config.seed, i, channel);
            let axis = Vec3::new(u(4) - 0.5, u(5) - 0.5, u(6) - 0.5).try_normalize().unwrap_or(Vec3::Y);
            DebrisSpec {
                size: between(config.size, u(0)),
                orbit_radius: between(config.orbit_radius, u(1)),
                angle: u(2) * TAU,
                speed: between(config.speed, u(3)),
                tumble_axis: axis,
                tumble: u(7) * config.max_tumble,
                shade: [0.4 + u(8) * 0.2, 0.4 + u(9) * 0.1, 0.4 + u(10) * 0.1],
            }
        })
        .collect()
}

// ── Asteroid belts ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    pub pos: Vec3,
    pub scale: f32,
    pub spin: f32,
}

/// A ring of model instances around the star. Drawn straight into the
/// render buffer, not through the scene.
#[derive(Debug, Clone)]
pub struct AsteroidBelt {
    pub slot: u32,
    pub asteroids: Vec<Asteroid>,
    /// Set once the host reports the model ready.
    pub loaded: bool,
}

impl AsteroidBelt {
    pub fn generate(config: &BeltConfig, slot: u32) -> Self {
        let asteroids = (0..config.count)
            .map(|i| {
                let u = |channel| unit(config.seed, i, channel);
                let radius = config.min_radius + (config.max_radius - config.min_radius) * u(0);
                let angle = u(1) * TAU;
                Asteroid {
                    pos: Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
                    scale: between([ASTEROID_SCALE.0, ASTEROID_SCALE.1], u(2)),
                    spin: 0.0,
                }
            })
            .collect();
        Self { slot, asteroids, loaded: false }
    }

    /// Rotate the whole belt about Y and spin each rock. Idle until loaded.
    pub fn tick(&mut self, settings: &GlobalSettings) {
        if !self.loaded {
            return;
        }
        let (s, c) = (BELT_DRIFT * settings.orbit_speed_multiplier).sin_cos();
        for rock in &mut self.asteroids {
            let Vec3 { x, y, z } = rock.pos;
            rock.pos = Vec3::new(x * c + z * s, y, z * c - x * s);
            rock.spin += ASTEROID_SPIN;
        }
    }

    pub fn render(&self, buffer: &mut RenderBuffer) {
        if !self.loaded {
            return;
        }
        for rock in &self.asteroids {
            buffer.push(MeshInstance::model(rock.pos, Quat::from_rotation_y(rock.spin), rock.scale, self.slot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn belt_config() -> BeltConfig {
        BeltConfig { model: "asteroid_pack".into(), count: 200, min_radius: 130.0, max_radius: 160.0, seed: 7 }
    }

    #[test]
    fn scatter_is_deterministic() {
        assert_eq!(scatter_hash(42), scatter_hash(42));
        assert_ne!(scatter_hash(0), scatter_hash(1));
        let a = AsteroidBelt::generate(&belt_config(), 3);
        let b = AsteroidBelt::generate(&belt_config(), 3);
        assert_eq!(a.asteroids, b.asteroids);
    }

    #[test]
    fn belt_stays_in_band_and_plane() {
        let mut belt = AsteroidBelt::generate(&belt_config(), 3);
        belt.loaded = true;
        let settings = GlobalSettings { orbit_speed_multiplier: 10.0, ..Default::default() };
        for _ in 0..500 {
            belt.tick(&settings);
        }
        for rock in &belt.asteroids {
            let r = rock.pos.length();
            assert!((129.9..=160.1).contains(&r), "radius {r}");
            assert_eq!(rock.pos.y, 0.0);
            assert!((0.8..=1.2).contains(&rock.scale));
        }
    }

    #[test]
    fn unloaded_belt_is_idle_and_invisible() {
        let mut belt = AsteroidBelt::generate(&belt_config(), 3);
        let before = belt.asteroids.clone();
        belt.tick(&GlobalSettings::default());
        assert_eq!(belt.asteroids, before);

        let mut buffer = RenderBuffer::new();
        belt.render(&mut buffer);
        assert_eq!(buffer.instance_count(), 0);
        belt.loaded = true;
        belt.render(&mut buffer);
        assert_eq!(buffer.instance_count(), 200);
    }

    #[test]
    fn blink_wraps_past_pi() {
        let mut blink = Blink::new(0.02);
        let mut wrapped = false;
        for _ in 0..200 {
            let before = blink.time;
            blink.tick();
            assert!(blink.time <= PI);
            assert!((0.5..=1.0).contains(&blink.intensity()));
            wrapped |= blink.time < before;
        }
        assert!(wrapped);
    }

    #[test]
    fn earth_moon_keeps_radius_and_tilt() {
        let config = MoonConfig {
            name: "Moon".into(),
            parent: "Earth".into(),
            orbit_radius: 10.0,
            speed: 0.001,
            tilt: Some(5.0),
            spin: 0.01,
            look: crate::catalog::MoonLook::Sphere { size: 1.6, texture: "moon".into() },
        };
        let moon = Moon::from_config(&config);
        for ms in [0.0, 500.0, 12_345.0, 3.6e7] {
            let p = moon.position_at(ms);
            assert!((p.length() - 10.0).abs() < 1e-3);
            assert!((p.y - p.z * 5f32.to_radians().tan()).abs() < 1e-3);
        }
    }

    #[test]
    fn detached_moon_is_skipped() {
        let config = MoonConfig {
            name: "Phobos".into(),
            parent: "Mars".into(),
            orbit_radius: 5.0,
            speed: 0.002,
            tilt: None,
            spin: 0.001,
            look: crate::catalog::MoonLook::Model { model: "phobos".into(), scale: 0.1 },
        };
        let mut moon = Moon::from_config(&config);
        let mut graph = TransformGraph::new();
        moon.update(1000.0, &mut graph);
        assert_eq!(moon.spin_angle, 0.0);

        moon.entity = Some(EntityId(9));
        graph.register(EntityId(9));
        moon.update(1000.0, &mut graph);
        assert_eq!(moon.spin_angle, 0.001);
        assert_eq!(graph.get_local(EntityId(9)).unwrap().offset, moon.position_at(1000.0));
    }

    #[test]
    fn satellite_follows_orbit_multiplier() {
        let config = SatelliteConfig {
            name: "ISS".into(),
            parent: "Earth".into(),
            orbit_radius: 9.0,
            speed: 0.0012,
            start_angle: 1.0,
            tilt: 0.2,
            size: 0.6,
            blink_rate: None,
            tumble: 0.01,
        };
        let mut sat = Satellite::from_config(&config, EntityId(5));
        sat.tick(&GlobalSettings { orbit_speed_multiplier: 0.0, ..Default::default() });
        assert_eq!(sat.angle, 1.0);
        sat.tick(&GlobalSettings::default());
        assert!((sat.angle - 1.0012).abs() < 1e-6);
        assert!((sat.position().length() - 9.0).abs() < 1e-3);
    }

    #[test]
    fn crafted_satellites_face_their_planet() {
        let config = SatelliteConfig {
            name: "Hubble".into(),
            parent: "Earth".into(),
            orbit_radius: 13.0,
            speed: 0.0007,
            start_angle: 2.3,
            tilt: 0.4,
            size: 0.5,
            blink_rate: None,
            tumble: 0.01,
        };
        let mut sat = Satellite::from_config(&config, EntityId(5));
        for _ in 0..500 {
            sat.tick(&GlobalSettings::default());
            let forward = sat.orientation * Vec3::Z;
            let toward = -sat.position().normalize();
            assert!(forward.angle_between(toward) < 0.02, "{forward} vs {toward}");
        }
    }

    #[test]
    fn debris_tumbles_freely() {
        let spec = DebrisSpec {
            size: 0.2,
            orbit_radius: 9.0,
            angle: 0.0,
            speed: 0.002,
            tumble_axis: Vec3::Y,
            tumble: 0.02,
            shade: [0.4, 0.35, 0.3],
        };
        let mut rock = Satellite::from_debris(&spec, EntityId(6));
        for _ in 0..100 {
            rock.tick(&GlobalSettings::default());
        }
        assert!((rock.orientation.angle_between(Quat::IDENTITY) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn debris_respects_ranges() {
        let config = DebrisConfig {
            parent: "Earth".into(),
            count: 15,
            seed: 1969,
            orbit_radius: [8.0, 15.0],
            speed: [0.001, 0.003],
            size: [0.15, 0.35],
            max_tumble: 0.02,
        };
        let rocks = scatter_debris(&config);
        assert_eq!(rocks.len(), 15);
        for rock in &rocks {
            assert!((8.0..=15.0).contains(&rock.orbit_radius));
            assert!((0.001..=0.003).contains(&rock.speed));
            assert!((0.15..=0.35).contains(&rock.size));
            assert!((rock.tumble_axis.length() - 1.0).abs() < 1e-4);
        }
    }
}
