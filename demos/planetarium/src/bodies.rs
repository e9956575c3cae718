/// Body registry — every planet of the active system and the scene entities
/// that draw it.
///
/// Picking hits entities, never bodies, so the registry keeps a reverse map
/// from each pickable entity (planet shell, atmosphere shell) to its owner.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat, Vec3};
use orrery_engine::{EntityId, TransformGraph};

use crate::catalog::BodyConfig;
use crate::orbit::{self, Ellipse};
use crate::settings::GlobalSettings;

/// Atmosphere shells turn independently of the planet beneath them.
pub const ATMOSPHERE_SPIN: f32 = 0.001;
/// Fixed lean of atmosphere shells about Z, radians.
pub const ATMOSPHERE_LEAN: f32 = 0.41;
/// Atmosphere shells sit just above the surface.
pub const ATMOSPHERE_MARGIN: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scene entities that make up one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParts {
    /// Orbit carrier: translated along the orbit, rotated by the inclination.
    pub group: EntityId,
    /// The planet sphere. Tilted and spun.
    pub shell: EntityId,
    pub atmosphere: Option<EntityId>,
    pub ring: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub orbit: Ellipse,
    /// Degrees.
    pub inclination: f32,
    /// Degrees.
    pub axial_tilt: f32,
    /// Radians, always in `[0, 2π)`.
    pub phase: f32,
    /// Radians per tick before the orbit multiplier.
    pub angular_speed: f32,
    /// Radians per tick before the spin multiplier.
    pub spin_speed: f32,
    pub spin_angle: f32,
    pub atmosphere_angle: f32,
    pub focus_offset: f32,
    pub info: String,
    pub parts: BodyParts,
}

impl Body {
    pub fn from_config(config: &BodyConfig, spin_speed: f32, parts: BodyParts) -> Self {
        Self {
            name: config.name.clone(),
            orbit: Ellipse::new(config.a, config.b, config.cx, config.cy, config.omega),
            inclination: config.inclination,
            axial_tilt: config.tilt,
            phase: 0.0,
            angular_speed: config.speed,
            spin_speed,
            spin_angle: 0.0,
            atmosphere_angle: 0.0,
            focus_offset: config.focus_offset,
            info: config.info.clone(),
            parts,
        }
    }

    /// Derived from phase and inclination only.
    pub fn world_position(&self) -> Vec3 {
        orbit::position_at_phase(&self.orbit, self.phase, self.inclination)
    }

    /// Orientation of the orbit carrier; children inherit the tilted plane.
    pub fn group_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.inclination.to_radians())
    }

    /// Axial tilt about Z, then the accumulated spin about the tilted Y axis.
    pub fn shell_rotation(&self) -> Quat {
        Quat::from_rotation_z(self.axial_tilt.to_radians()) * Quat::from_rotation_y(self.spin_angle)
    }

    pub fn atmosphere_rotation(&self) -> Quat {
        Quat::from_rotation_z(ATMOSPHERE_LEAN) * Quat::from_rotation_y(self.atmosphere_angle)
    }

    /// Rings lie flat in the orbit plane, leaning with the axial tilt.
    pub fn ring_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, -FRAC_PI_2, -self.axial_tilt.to_radians(), 0.0)
    }

    fn tick(&mut self, settings: &GlobalSettings) {
        self.phase = orbit::advance(self.phase, self.angular_speed, settings.orbit_speed_multiplier);
        self.spin_angle += self.spin_speed * settings.spin_speed_multiplier;
        if self.parts.atmosphere.is_some() {
            self.atmosphere_angle += ATMOSPHERE_SPIN * settings.spin_speed_multiplier;
        }
    }
}

/// All bodies of one system, in table order.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    owners: HashMap<EntityId, BodyId>,
    targets: Vec<EntityId>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `body`; every entity in `render_targets` becomes pickable and
    /// resolves back to it.
    pub fn register(&mut self, body: Body, render_targets: &[EntityId]) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        for &entity in render_targets {
            self.owners.insert(entity, id);
            self.targets.push(entity);
        }
        self.bodies.push(body);
        id
    }

    /// Advance every body's phase and spin by one tick.
    pub fn tick(&mut self, settings: &GlobalSettings) {
        for body in &mut self.bodies {
            body.tick(settings);
        }
    }

    /// Owner of a picked entity.
    pub fn resolve(&self, entity: EntityId) -> Option<BodyId> {
        self.owners.get(&entity).copied()
    }

    /// Entities a pick ray is tested against.
    pub fn targets(&self) -> &[EntityId] {
        &self.targets
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(|i| BodyId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Push current kinematics into the transform hierarchy.
    pub fn sync(&self, graph: &mut TransformGraph) {
        for body in &self.bodies {
            if let Some(local) = graph.get_local_mut(body.parts.group) {
                local.offset = body.world_position();
                local.rotation = body.group_rotation();
            }
            if let Some(local) = graph.get_local_mut(body.parts.shell) {
                local.rotation = body.shell_rotation();
            }
            if let Some(atmosphere) = body.parts.atmosphere {
                if let Some(local) = graph.get_local_mut(atmosphere) {
                    local.rotation = body.atmosphere_rotation();
                }
            }
            if let Some(ring) = body.parts.ring {
                if let Some(local) = graph.get_local_mut(ring) {
                    local.rotation = body.ring_rotation();
                }
            }
        }
    }
}
