use glam::Vec2;

use crate::api::types::{Description, EntityId, GameEvent};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
use crate::renderer::instance::RenderBuffer;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds. `None` runs exactly one update per host frame,
    /// so per-tick increments are tied to the display refresh rate.
    pub fixed_dt: Option<f32>,
    /// Initial viewport width in CSS pixels.
    pub viewport_width: f32,
    /// Initial viewport height in CSS pixels.
    pub viewport_height: f32,
    /// Maximum number of mesh instances (default: 4608).
    pub max_instances: usize,
    /// Maximum number of line vertices (default: 4096).
    pub max_line_vertices: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: None,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            max_instances: 4608,
            max_line_vertices: 4096,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Consume input, advance the simulation, emit events.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for instances that do not live in the scene.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Text for a host overlay keyed by a game-defined index.
    fn describe(&self, _index: u32) -> Option<Description> {
        None
    }

    /// JSON asset manifest the host should load on startup.
    fn asset_manifest(&self) -> Option<String> {
        None
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: Camera3D,
    pub events: Vec<GameEvent>,
    /// Viewport size in CSS pixels.
    pub viewport: Vec2,
    elapsed_ms: f64,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_viewport(Vec2::new(1280.0, 720.0))
    }

    pub fn with_viewport(viewport: Vec2) -> Self {
        let mut camera = Camera3D::default();
        camera.set_aspect(viewport.x, viewport.y);
        Self {
            scene: Scene::new(),
            camera,
            events: Vec::new(),
            viewport,
            elapsed_ms: 0.0,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Advance the wall clock by one host frame.
    pub fn advance_clock(&mut self, frame_dt: f32) {
        self.elapsed_ms += frame_dt as f64 * 1000.0;
    }

    /// Milliseconds of wall-clock time since the runner started.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Propagate a new viewport size to the camera.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport = Vec2::new(width, height);
        self.camera.set_aspect(width, height);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
}
