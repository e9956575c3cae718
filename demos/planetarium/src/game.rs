/// Planetarium — a navigable 3D model of four planetary systems.
///
/// The browser host owns the GPU renderer, the control panel, the info panel
/// and the minimap widget. Everything they show is driven from here through
/// input events in and game events out.

use glam::Vec2;
use orrery_engine::*;

use crate::builder::{self, ASSETS_JSON};
use crate::catalog::{StarSystemConfig, SystemId};
use crate::context::SimulationContext;
use crate::minimap::{self, MinimapView};
use crate::navigator::{CameraMode, NavigatorEvent, ROTATE_STEP};
use crate::picking;
use crate::settings::GlobalSettings;

// ── Custom event kinds from the host ─────────────────────────────────

const CUSTOM_SET_ORBIT_SPEED: u32 = 1;
const CUSTOM_SET_SPIN_SPEED: u32 = 2;
const CUSTOM_SET_STAR_BRIGHTNESS: u32 = 3;
const CUSTOM_SET_ORBITS_VISIBLE: u32 = 4;
/// Info panel close button: fly back to the overview.
const CUSTOM_CLOSE_INFO: u32 = 5;
/// Info panel dismissed without moving the camera.
const CUSTOM_CLOSE_INFO_STAY: u32 = 6;
const CUSTOM_ZOOM_IN: u32 = 7;
const CUSTOM_ZOOM_OUT: u32 = 8;
const CUSTOM_RESET_VIEW: u32 = 9;
/// Click on the minimap; a, b = NDC within the minimap widget.
const CUSTOM_MINIMAP_NAVIGATE: u32 = 10;
/// a = system index.
const CUSTOM_SWITCH_SYSTEM: u32 = 11;

// ── Game event kinds to the host ─────────────────────────────────────

/// a = body index (look up text with `game_describe_*`).
const EVENT_SHOW_INFO: f32 = 1.0;
const EVENT_HIDE_INFO: f32 = 2.0;
/// a = mode code.
const EVENT_CAMERA_MODE: f32 = 3.0;
/// a = orbit multiplier, b = spin multiplier, c = star brightness.
const EVENT_SETTINGS: f32 = 4.0;
/// a = system index, b = body count.
const EVENT_SYSTEM_LOADED: f32 = 5.0;
/// a = half width, b = half height, c = height of the overview camera.
const EVENT_MINIMAP_VIEW: f32 = 6.0;
/// a = x, b = z of the main camera, c = orbit radius.
const EVENT_MINIMAP_CAMERA: f32 = 7.0;
/// a = shader time, b = emissive, c = corona glow.
const EVENT_STAR: f32 = 8.0;

// ── Keys (DOM keyCode) ───────────────────────────────────────────────

const KEY_W: u32 = 87;
const KEY_S: u32 = 83;
const KEY_A: u32 = 65;
const KEY_D: u32 = 68;
const KEY_PAGE_UP: u32 = 33;
const KEY_PAGE_DOWN: u32 = 34;

// ── Zoom factors ─────────────────────────────────────────────────────

const WHEEL_OUT: f32 = 1.1;
const WHEEL_IN: f32 = 0.9;
const BUTTON_IN: f32 = 0.8;
const BUTTON_OUT: f32 = 1.25;

pub struct Planetarium {
    manifest: AssetManifest,
    assets: AssetTracker,
    /// Table for the first system, consumed by `init`.
    boot: Option<StarSystemConfig>,
    sim: Option<SimulationContext>,
    /// Last values reported to the host.
    reported_mode: Option<CameraMode>,
    reported_settings: Option<GlobalSettings>,
}

impl Planetarium {
    pub fn new() -> Self {
        let manifest = builder::embedded_manifest();
        let assets = AssetTracker::new(&manifest);
        let boot = SystemId::Sol
            .load()
            .map_err(|err| log::error!("embedded Sol table rejected: {err}"))
            .ok();
        Self {
            manifest,
            assets,
            boot,
            sim: None,
            reported_mode: None,
            reported_settings: None,
        }
    }

    fn load(&mut self, system: SystemId, config: StarSystemConfig, ctx: &mut EngineContext) {
        let mut settings = self.sim.as_ref().map_or_else(GlobalSettings::default, |s| s.settings);
        if self.sim.as_ref().is_some_and(|s| s.camera.focus.is_some()) {
            // A focus froze the orbits; the new system starts unfocused.
            settings.orbit_speed_multiplier = 1.0;
            ctx.emit_event(GameEvent::new(EVENT_HIDE_INFO, 0.0, 0.0, 0.0));
        }

        ctx.scene.clear();
        let sim = builder::spawn_system(system, config, settings, &self.manifest, &self.assets, ctx);

        let view = MinimapView::from_config(&sim.config.minimap);
        ctx.emit_event(GameEvent::new(EVENT_SYSTEM_LOADED, system.index() as f32, sim.registry.len() as f32, 0.0));
        ctx.emit_event(GameEvent::new(EVENT_MINIMAP_VIEW, view.half_width, view.half_height, view.height));
        self.sim = Some(sim);
        self.reported_mode = None;
        self.reported_settings = None;
    }

    fn switch_system(&mut self, index: u32, ctx: &mut EngineContext) {
        let Some(system) = SystemId::from_index(index) else {
            log::warn!("unknown system index {index}");
            return;
        };
        if self.sim.as_ref().is_some_and(|s| s.system == system) {
            return;
        }
        match system.load() {
            Ok(config) => self.load(system, config, ctx),
            Err(err) => log::error!("cannot switch to {system:?}: {err}"),
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::Resize { width, height } => ctx.resize(width, height),
                InputEvent::AssetLoaded { slot, ok } => {
                    let ready = self.assets.report(&self.manifest, slot, ok) == Some(AssetStatus::Ready);
                    if let (true, Some(sim)) = (ready, self.sim.as_mut()) {
                        sim.attach_assets(slot, ctx, &self.manifest);
                    }
                }
                InputEvent::Custom { kind: CUSTOM_SWITCH_SYSTEM, a, .. } => {
                    self.switch_system(a.max(0.0) as u32, ctx);
                }
                other => {
                    if let Some(sim) = self.sim.as_mut() {
                        handle_sim_input(sim, other, ctx);
                    }
                }
            }
        }
    }

    fn emit_changes(&mut self, ctx: &mut EngineContext) {
        let Some(sim) = self.sim.as_ref() else { return };
        if self.reported_mode != Some(sim.camera.mode) {
            ctx.emit_event(GameEvent::new(EVENT_CAMERA_MODE, sim.camera.mode.code(), 0.0, 0.0));
            self.reported_mode = Some(sim.camera.mode);
        }
        if self.reported_settings != Some(sim.settings) {
            let s = sim.settings;
            ctx.emit_event(GameEvent::new(
                EVENT_SETTINGS,
                s.orbit_speed_multiplier,
                s.spin_speed_multiplier,
                s.star_brightness,
            ));
            self.reported_settings = Some(s);
        }
    }
}

impl Default for Planetarium {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that needs a loaded system.
fn handle_sim_input(sim: &mut SimulationContext, event: InputEvent, ctx: &mut EngineContext) {
    match event {
        InputEvent::PointerDown { x, y } => {
            let pos = Vec2::new(x, y);
            sim.pointer = Some(pos);
            match picking::pick(&ctx.camera, &ctx.scene, &sim.registry, pos, ctx.viewport) {
                Some(body) => {
                    if sim.info_panel.is_some() {
                        ctx.emit_event(GameEvent::new(EVENT_HIDE_INFO, 0.0, 0.0, 0.0));
                    }
                    sim.select(body);
                }
                None => sim.drag = Some(pos),
            }
        }
        InputEvent::PointerMove { x, y } => {
            let pos = Vec2::new(x, y);
            sim.pointer = Some(pos);
            if let Some(prev) = sim.drag {
                let delta = pos - prev;
                sim.camera.orbit_drag(delta.x, delta.y);
                sim.drag = Some(pos);
            }
        }
        InputEvent::PointerUp { .. } => sim.drag = None,
        InputEvent::Wheel { delta_y } => {
            sim.camera.zoom(if delta_y > 0.0 { WHEEL_OUT } else { WHEEL_IN });
        }
        InputEvent::KeyDown { key_code } => {
            match key_code {
                KEY_W => sim.camera.rotate(0.0, -ROTATE_STEP),
                KEY_S => sim.camera.rotate(0.0, ROTATE_STEP),
                KEY_A => sim.camera.rotate(ROTATE_STEP, 0.0),
                KEY_D => sim.camera.rotate(-ROTATE_STEP, 0.0),
                KEY_PAGE_UP => sim.camera.zoom(WHEEL_IN),
                KEY_PAGE_DOWN => sim.camera.zoom(WHEEL_OUT),
                _ => false,
            };
        }
        InputEvent::Custom { kind, a, b, .. } => match kind {
            CUSTOM_SET_ORBIT_SPEED => sim.settings.set_orbit_speed(a),
            CUSTOM_SET_SPIN_SPEED => sim.settings.set_spin_speed(a),
            CUSTOM_SET_STAR_BRIGHTNESS => sim.settings.set_star_brightness(a),
            CUSTOM_SET_ORBITS_VISIBLE => sim.set_orbits_visible(a != 0.0, &mut ctx.scene),
            CUSTOM_CLOSE_INFO => {
                ctx.emit_event(GameEvent::new(EVENT_HIDE_INFO, 0.0, 0.0, 0.0));
                sim.dismiss_and_return();
            }
            CUSTOM_CLOSE_INFO_STAY => {
                ctx.emit_event(GameEvent::new(EVENT_HIDE_INFO, 0.0, 0.0, 0.0));
                sim.dismiss_in_place();
            }
            CUSTOM_ZOOM_IN => {
                sim.camera.zoom(BUTTON_IN);
            }
            CUSTOM_ZOOM_OUT => {
                sim.camera.zoom(BUTTON_OUT);
            }
            CUSTOM_RESET_VIEW => {
                sim.camera.reset_view();
            }
            CUSTOM_MINIMAP_NAVIGATE => {
                let target = minimap::target_from_ndc(Vec2::new(a, b), &sim.config.minimap);
                sim.camera.set_planar(target.x, target.y, sim.config.minimap.max_distance);
            }
            _ => {}
        },
        InputEvent::Resize { .. } | InputEvent::AssetLoaded { .. } => {}
    }
}

/// One simulation tick, after input.
fn step(sim: &mut SimulationContext, ctx: &mut EngineContext) {
    // ── Star ─────────────────────────────────────────────────────────
    sim.star.tick(&sim.settings);
    sim.star.apply(&sim.settings, &mut ctx.scene);

    // ── Planets ──────────────────────────────────────────────────────
    sim.registry.tick(&sim.settings);
    sim.registry.sync(&mut sim.graph);

    // ── Moons, satellites, belts ─────────────────────────────────────
    let elapsed = ctx.elapsed_ms();
    for moon in &mut sim.moons {
        moon.update(elapsed, &mut sim.graph);
    }
    for satellite in &mut sim.satellites {
        satellite.tick(&sim.settings);
        satellite.apply(&mut sim.graph, &mut ctx.scene);
    }
    for belt in &mut sim.belts {
        belt.tick(&sim.settings);
    }
    sim.graph.propagate(&mut ctx.scene);

    // ── Hover ────────────────────────────────────────────────────────
    let hovered = sim
        .pointer
        .and_then(|p| picking::pick(&ctx.camera, &ctx.scene, &sim.registry, p, ctx.viewport));
    sim.hover.set(hovered, &sim.registry, &mut ctx.scene);

    // ── Camera ───────────────────────────────────────────────────────
    match sim.camera.update() {
        Some(NavigatorEvent::Arrived(body)) => {
            log::debug!("arrived at body {}", body.0);
            sim.info_panel = Some(body);
            ctx.emit_event(GameEvent::new(EVENT_SHOW_INFO, body.0 as f32, 0.0, 0.0));
        }
        Some(NavigatorEvent::Returned) => log::debug!("back at overview"),
        None => {}
    }
    sim.camera.apply_to(&mut ctx.camera);

    // ── Minimap ──────────────────────────────────────────────────────
    let marker = minimap::indicator_position(sim.camera.position);
    if let Some(indicator) = ctx.scene.get_mut(sim.indicator) {
        indicator.pos = marker;
    }
    ctx.emit_event(GameEvent::new(EVENT_MINIMAP_CAMERA, marker.x, marker.z, sim.camera.spherical.radius));
    ctx.emit_event(GameEvent::new(
        EVENT_STAR,
        sim.star.shader_time,
        sim.settings.star_emissive(),
        sim.settings.corona_glow(),
    ));
}

impl Game for Planetarium {
    fn config(&self) -> GameConfig {
        let tick_rate = self.boot.as_ref().and_then(|c| c.tick_rate).filter(|r| *r > 0.0);
        GameConfig {
            fixed_dt: tick_rate.map(|r| 1.0 / r),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        match self.boot.take() {
            Some(config) => self.load(SystemId::Sol, config, ctx),
            None => log::error!("no system to show"),
        }
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.handle_input(ctx, input);
        if let Some(sim) = self.sim.as_mut() {
            step(sim, ctx);
        }
        self.emit_changes(ctx);
    }

    fn render(&self, ctx: &mut RenderContext) {
        let Some(sim) = self.sim.as_ref() else { return };
        for belt in &sim.belts {
            belt.render(ctx.render_buffer);
        }
    }

    fn describe(&self, index: u32) -> Option<Description> {
        let sim = self.sim.as_ref()?;
        let body = sim.registry.get(crate::bodies::BodyId(index))?;
        Some(Description { title: body.name.clone(), body: body.info.clone() })
    }

    fn asset_manifest(&self) -> Option<String> {
        Some(ASSETS_JSON.to_string())
    }
}
