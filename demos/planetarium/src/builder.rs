/// Scene construction — turns one star-system table into entities, transform
/// links and the simulation state that drives them.

use glam::Vec3;
use orrery_engine::{
    AssetManifest, AssetTracker, EngineContext, Entity, EntityId, MeshColor, MeshComponent, TransformGraph,
};

use crate::bodies::{self, Body, BodyParts, BodyRegistry};
use crate::catalog::{BodyConfig, MoonLook, StarSystemConfig, SystemId};
use crate::context::{attach_model_moon, PendingModel, SimulationContext, StarState};
use crate::navigator::CameraState;
use crate::orbit::{self, PATH_SEGMENTS};
use crate::picking::Hover;
use crate::satellites::{scatter_debris, AsteroidBelt, Moon, Satellite};
use crate::settings::GlobalSettings;

pub const ASSETS_JSON: &str = include_str!("../data/assets.json");

/// Corona shell radius relative to the star.
const CORONA_SCALE: f32 = 1.075;
const CORONA_OPACITY: f32 = 0.35;
const CORONA_COLOR: MeshColor = MeshColor::new(1.0, 0.6, 0.2);
const ATMOSPHERE_OPACITY: f32 = 0.4;
const RING_OPACITY: f32 = 0.8;
const ORBIT_PATH_COLOR: MeshColor = MeshColor::new(0.5, 0.5, 0.5);
const SATELLITE_COLOR: MeshColor = MeshColor::new(0.8, 0.8, 0.85);
const INDICATOR_COLOR: MeshColor = MeshColor::new(1.0, 0.0, 0.0);

/// The texture and model manifest shared by every system.
pub fn embedded_manifest() -> AssetManifest {
    AssetManifest::from_json(ASSETS_JSON).unwrap_or_else(|err| {
        log::error!("asset manifest unreadable: {err}");
        AssetManifest::default()
    })
}

/// Spawn `config` into `ctx` and return the state that animates it.
/// Decorations whose assets `tracker` already holds attach immediately.
pub fn spawn_system(
    system: SystemId,
    config: StarSystemConfig,
    settings: GlobalSettings,
    manifest: &AssetManifest,
    tracker: &AssetTracker,
    ctx: &mut EngineContext,
) -> SimulationContext {
    let mut graph = TransformGraph::new();
    let texture = |name: &str| {
        let slot = manifest.slot(name);
        if slot.is_none() {
            log::warn!("no asset named `{name}`; drawing untextured");
        }
        slot
    };

    // ── Star ─────────────────────────────────────────────────────────
    let star_id = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(star_id).with_tag(config.star.name.clone()).with_mesh(
            MeshComponent::sphere(config.star.size)
                .with_texture(texture(&config.star.texture))
                .with_emissive(settings.star_emissive()),
        ),
    );
    let corona_id = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(corona_id).with_tag("corona").with_mesh(
            MeshComponent::sphere(config.star.size * CORONA_SCALE)
                .with_color(CORONA_COLOR)
                .with_opacity(CORONA_OPACITY)
                .with_emissive(settings.corona_glow()),
        ),
    );

    // ── Planets ──────────────────────────────────────────────────────
    let mut registry = BodyRegistry::new();
    let mut orbit_paths = Vec::with_capacity(config.bodies.len());
    for body in &config.bodies {
        let parts = spawn_body(body, &texture, ctx, &mut graph);
        let mut targets = vec![parts.shell];
        targets.extend(parts.atmosphere);
        registry.register(Body::from_config(body, config.spin_for(&body.name), parts), &targets);

        let path_id = ctx.next_id();
        let ellipse = orbit::Ellipse::new(body.a, body.b, body.cx, body.cy, body.omega);
        ctx.scene.spawn(
            Entity::new(path_id)
                .with_tag("orbit")
                .with_active(settings.orbits_visible)
                .with_mesh(
                    MeshComponent::line_loop(orbit::sample_path(&ellipse, body.inclination, PATH_SEGMENTS))
                        .with_color(ORBIT_PATH_COLOR),
                ),
        );
        orbit_paths.push(path_id);
    }
    let carrier = |name: &str| {
        let id = registry.find_by_name(name)?;
        Some(registry.get(id)?.parts.group)
    };

    // ── Moons ────────────────────────────────────────────────────────
    let mut moons = Vec::with_capacity(config.moons.len());
    let mut pending_models = Vec::new();
    for moon_cfg in &config.moons {
        let Some(group) = carrier(&moon_cfg.parent) else { continue };
        let mut moon = Moon::from_config(moon_cfg);
        match &moon_cfg.look {
            MoonLook::Sphere { size, texture: tex } => {
                let id = ctx.next_id();
                ctx.scene.spawn(
                    Entity::new(id)
                        .with_tag(moon.name.clone())
                        .with_mesh(MeshComponent::sphere(*size).with_texture(texture(tex))),
                );
                graph.register(id);
                graph.set_parent(id, Some(group));
                moon.entity = Some(id);
            }
            MoonLook::Model { model, scale } => {
                let Some(slot) = texture(model) else { continue };
                let pending = PendingModel { moon: moons.len(), slot, scale: *scale, carrier: group };
                if tracker.is_ready(slot) {
                    let id = ctx.next_id();
                    attach_model_moon(&mut moon, id, &pending, &mut ctx.scene, &mut graph);
                } else {
                    pending_models.push(pending);
                }
            }
        }
        moons.push(moon);
    }

    // ── Satellites and debris ────────────────────────────────────────
    let mut satellites = Vec::new();
    for sat_cfg in &config.satellites {
        let Some(group) = carrier(&sat_cfg.parent) else { continue };
        let id = spawn_orbiter(ctx, &mut graph, group, &sat_cfg.name, sat_cfg.size, SATELLITE_COLOR);
        satellites.push(Satellite::from_config(sat_cfg, id));
    }
    if let Some(debris) = &config.debris {
        if let Some(group) = carrier(&debris.parent) {
            for spec in &scatter_debris(debris) {
                let [r, g, b] = spec.shade;
                let id = spawn_orbiter(ctx, &mut graph, group, "debris", spec.size, MeshColor::new(r, g, b));
                satellites.push(Satellite::from_debris(spec, id));
            }
        }
    }

    // ── Asteroid belts ───────────────────────────────────────────────
    let belts = config
        .asteroid_belts
        .iter()
        .filter_map(|belt| {
            let slot = texture(&belt.model)?;
            let mut generated = AsteroidBelt::generate(belt, slot);
            generated.loaded = tracker.is_ready(slot);
            Some(generated)
        })
        .collect();

    // ── Camera and minimap marker ────────────────────────────────────
    let camera = CameraState::new(&config.camera);
    let indicator = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(indicator).with_tag("camera_indicator").with_pos(camera.position).with_mesh(
            MeshComponent::sphere(config.minimap.indicator_radius)
                .with_color(INDICATOR_COLOR)
                .with_emissive(1.0),
        ),
    );
    camera.apply_to(&mut ctx.camera);

    registry.sync(&mut graph);
    graph.propagate(&mut ctx.scene);

    log::info!(
        "{} loaded: {} bodies, {} moons, {} satellites, {} belts",
        config.name,
        registry.len(),
        moons.len(),
        satellites.len(),
        config.asteroid_belts.len()
    );

    SimulationContext {
        system,
        config,
        settings,
        camera,
        registry,
        graph,
        star: StarState::new(star_id, corona_id),
        moons,
        pending_models,
        satellites,
        belts,
        orbit_paths,
        indicator,
        hover: Hover::new(),
        info_panel: None,
        pointer: None,
        drag: None,
    }
}

/// Orbit carrier, planet shell, and the optional atmosphere and ring.
fn spawn_body(
    body: &BodyConfig,
    texture: &impl Fn(&str) -> Option<u32>,
    ctx: &mut EngineContext,
    graph: &mut TransformGraph,
) -> BodyParts {
    let group = ctx.next_id();
    ctx.scene.spawn(Entity::new(group).with_tag(body.name.clone()));
    graph.register(group);

    let shell = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(shell)
            .with_tag(body.name.clone())
            .with_mesh(MeshComponent::sphere(body.size).with_texture(texture(&body.texture))),
    );
    graph.register(shell);
    graph.set_parent(shell, Some(group));

    let atmosphere = body.atmosphere.as_deref().map(|tex| {
        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id).with_tag(format!("{} atmosphere", body.name)).with_mesh(
                MeshComponent::sphere(body.size + bodies::ATMOSPHERE_MARGIN)
                    .with_texture(texture(tex))
                    .with_opacity(ATMOSPHERE_OPACITY),
            ),
        );
        graph.register(id);
        graph.set_parent(id, Some(shell));
        id
    });

    let ring = body.ring.as_ref().map(|ring| {
        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id).with_tag(format!("{} ring", body.name)).with_mesh(
                MeshComponent::ring(ring.inner, ring.outer)
                    .with_texture(texture(&ring.texture))
                    .with_opacity(RING_OPACITY),
            ),
        );
        graph.register(id);
        graph.set_parent(id, Some(group));
        id
    });

    BodyParts { group, shell, atmosphere, ring }
}

/// A small sphere riding on `group`, placed each tick by its `Satellite`.
fn spawn_orbiter(
    ctx: &mut EngineContext,
    graph: &mut TransformGraph,
    group: EntityId,
    tag: &str,
    size: f32,
    color: MeshColor,
) -> EntityId {
    let id = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(id)
            .with_tag(tag)
            .with_pos(Vec3::ZERO)
            .with_mesh(MeshComponent::sphere(size).with_color(color)),
    );
    graph.register(id);
    graph.set_parent(id, Some(group));
    id
}
