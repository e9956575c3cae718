/// Simulation context — all mutable state of the loaded system, owned by the
/// game and threaded explicitly through every operation.

use glam::{Quat, Vec2, Vec3};
use orrery_engine::{
    AssetManifest, EngineContext, Entity, EntityId, LocalTransform, MeshComponent, Scene, TransformGraph,
};

use crate::bodies::{BodyId, BodyRegistry};
use crate::catalog::{StarSystemConfig, SystemId};
use crate::navigator::{CameraMode, CameraState};
use crate::picking::Hover;
use crate::satellites::{AsteroidBelt, Moon, Satellite};
use crate::settings::GlobalSettings;

/// Star self-rotation per tick, before the spin multiplier.
pub const STAR_SPIN: f32 = 0.004;
/// Surface shader clock increment per tick.
pub const STAR_TIME_STEP: f32 = 0.015;

#[derive(Debug, Clone, Copy)]
pub struct StarState {
    pub entity: EntityId,
    pub corona: EntityId,
    pub spin_angle: f32,
    pub shader_time: f32,
}

impl StarState {
    pub fn new(entity: EntityId, corona: EntityId) -> Self {
        Self { entity, corona, spin_angle: 0.0, shader_time: 0.0 }
    }

    pub fn tick(&mut self, settings: &GlobalSettings) {
        self.shader_time += STAR_TIME_STEP;
        self.spin_angle += STAR_SPIN * settings.spin_speed_multiplier;
    }

    /// Write spin and brightness into the star and corona meshes.
    pub fn apply(&self, settings: &GlobalSettings, scene: &mut Scene) {
        if let Some(star) = scene.get_mut(self.entity) {
            star.rotation = Quat::from_rotation_y(self.spin_angle);
            if let Some(mesh) = star.mesh.as_mut() {
                mesh.emissive = settings.star_emissive();
            }
        }
        if let Some(mesh) = scene.get_mut(self.corona).and_then(|e| e.mesh.as_mut()) {
            mesh.emissive = settings.corona_glow();
        }
    }
}

/// A model-backed moon waiting for its asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingModel {
    /// Index into `SimulationContext::moons`.
    pub moon: usize,
    pub slot: u32,
    pub scale: f32,
    /// Orbit carrier of the parent body.
    pub carrier: EntityId,
}

pub struct SimulationContext {
    pub system: SystemId,
    pub config: StarSystemConfig,
    pub settings: GlobalSettings,
    pub camera: CameraState,
    pub registry: BodyRegistry,
    pub graph: TransformGraph,
    pub star: StarState,
    pub moons: Vec<Moon>,
    pub pending_models: Vec<PendingModel>,
    pub satellites: Vec<Satellite>,
    pub belts: Vec<AsteroidBelt>,
    pub orbit_paths: Vec<EntityId>,
    pub indicator: EntityId,
    pub hover: Hover,
    /// Body whose info panel is open.
    pub info_panel: Option<BodyId>,
    /// Last known pointer position, viewport pixels.
    pub pointer: Option<Vec2>,
    /// Previous pointer position while a drag orbit is active.
    pub drag: Option<Vec2>,
}

impl SimulationContext {
    /// Start flying to `body`. Any open panel closes first and orbits freeze
    /// for the approach. Returns whether the navigator accepted the target.
    pub fn select(&mut self, body: BodyId) -> bool {
        let Some(target) = self.registry.get(body) else { return false };
        let (position, offset) = (target.world_position(), target.focus_offset);
        if self.camera.mode == CameraMode::Returning {
            log::debug!("ignoring pick of {} while returning", target.name);
            return false;
        }
        log::debug!("focusing {}", target.name);
        self.info_panel = None;
        self.settings.orbit_speed_multiplier = 0.0;
        self.camera.focus(body, position, offset)
    }

    /// Close the panel and glide back to the overview.
    pub fn dismiss_and_return(&mut self) {
        self.info_panel = None;
        self.settings.orbit_speed_multiplier = 1.0;
        self.camera.request_return();
    }

    /// Close the panel and resume orbits without moving the camera.
    pub fn dismiss_in_place(&mut self) {
        self.info_panel = None;
        self.settings.orbit_speed_multiplier = 1.0;
        self.camera.dismiss_in_place();
    }

    pub fn set_orbits_visible(&mut self, visible: bool, scene: &mut Scene) {
        self.settings.orbits_visible = visible;
        for &id in &self.orbit_paths {
            if let Some(path) = scene.get_mut(id) {
                path.active = visible;
            }
        }
    }

    /// Attach every decoration that was waiting on `slot`.
    pub fn attach_assets(&mut self, slot: u32, ctx: &mut EngineContext, manifest: &AssetManifest) {
        let (ready, waiting): (Vec<_>, Vec<_>) = self.pending_models.drain(..).partition(|p| p.slot == slot);
        self.pending_models = waiting;
        for pending in ready {
            let Some(moon) = self.moons.get_mut(pending.moon) else { continue };
            let id = ctx.next_id();
            attach_model_moon(moon, id, &pending, &mut ctx.scene, &mut self.graph);
            log::debug!("{} attached", moon.name);
        }
        for belt in self.belts.iter_mut().filter(|b| b.slot == slot && !b.loaded) {
            belt.loaded = true;
            let name = manifest.get(slot).map_or("?", |a| a.name.as_str());
            log::debug!("asteroid belt of {} rocks ({name}) ready", belt.asteroids.len());
        }
    }
}

pub(crate) fn attach_model_moon(moon: &mut Moon, id: EntityId, pending: &PendingModel, scene: &mut Scene, graph: &mut TransformGraph) {
    let scale = Vec3::splat(pending.scale);
    scene.spawn(
        Entity::new(id)
            .with_tag(moon.name.clone())
            .with_scale(scale)
            .with_mesh(MeshComponent::model(pending.slot)),
    );
    graph.register_with(id, LocalTransform::new().with_scale(scale));
    graph.set_parent(id, Some(pending.carrier));
    moon.entity = Some(id);
}
