use orrery_engine::{
    Description, EngineContext, Game, GameConfig, InputEvent, InputQueue, ProtocolLayout,
    RenderBuffer, RenderContext, TickMode,
};
use orrery_engine::renderer::camera::CameraUniform;
use orrery_engine::systems::render::build_render_buffer;
use glam::Vec2;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    tick_mode: TickMode,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    /// Flat camera uniform for SharedArrayBuffer reads.
    camera_data: [f32; CameraUniform::FLOATS],
    frame: u64,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);
        let render_buffer = RenderBuffer::with_capacity(config.max_instances, config.max_line_vertices);
        let ctx = EngineContext::with_viewport(Vec2::new(config.viewport_width, config.viewport_height));

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            render_buffer,
            tick_mode: TickMode::from_fixed_dt(config.fixed_dt),
            layout,
            config,
            initialized: false,
            camera_data: [0.0; CameraUniform::FLOATS],
            frame: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.camera_data = self.ctx.camera.uniform().to_floats();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: update the game zero or more times, then rebuild
    /// the instance, line and camera buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();
        self.ctx.advance_clock(dt);

        // Input is delivered to the first update only; with zero steps it waits.
        let steps = self.tick_mode.steps(dt);
        for step in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            if step == 0 {
                self.input.drain();
            }
        }

        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
            };
            self.game.render(&mut render_ctx);
        }
        self.render_buffer.finish();

        self.camera_data = self.ctx.camera.uniform().to_floats();
        self.ctx.events.truncate(self.layout.max_events);
        self.frame += 1;
    }

    pub fn describe(&self, index: u32) -> Option<Description> {
        self.game.describe(index)
    }

    pub fn asset_manifest(&self) -> Option<String> {
        self.game.asset_manifest()
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn translucent_split(&self) -> u32 {
        self.render_buffer.translucent_split
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.render_buffer.lines_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.render_buffer.line_vertex_count()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.camera_data.as_ptr()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn viewport_width(&self) -> f32 {
        self.ctx.viewport.x
    }

    pub fn viewport_height(&self) -> f32 {
        self.ctx.viewport.y
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_line_vertices(&self) -> u32 {
        self.layout.max_line_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{Entity, GameEvent, MeshComponent};

    /// Counts updates and echoes pointer-downs as events.
    struct Probe {
        updates: u32,
        clicks: u32,
        fixed_dt: Option<f32>,
    }

    impl Game for Probe {
        fn config(&self) -> GameConfig {
            GameConfig {
                fixed_dt: self.fixed_dt,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(Entity::new(id).with_mesh(MeshComponent::sphere(1.0)));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            for event in input.iter() {
                if let InputEvent::PointerDown { .. } = event {
                    self.clicks += 1;
                    ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
                }
            }
        }
    }

    fn probe(fixed_dt: Option<f32>) -> GameRunner<Probe> {
        let mut runner = GameRunner::new(Probe { updates: 0, clicks: 0, fixed_dt });
        runner.init();
        runner
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut runner = GameRunner::new(Probe { updates: 0, clicks: 0, fixed_dt: None });
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game.updates, 0);
    }

    #[test]
    fn per_frame_mode_updates_once_and_builds_buffers() {
        let mut runner = probe(None);
        runner.push_input(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        runner.tick(1.0 / 144.0);
        assert_eq!(runner.game.updates, 1);
        assert_eq!(runner.game_events_len(), 1);
        assert_eq!(runner.instance_count(), 1);
        assert_eq!(runner.frame_counter(), 1);
    }

    #[test]
    fn fixed_mode_delivers_input_once() {
        let mut runner = probe(Some(1.0 / 60.0));
        runner.push_input(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        runner.tick(3.0 / 60.0 + 0.001);
        assert_eq!(runner.game.updates, 3);
        assert_eq!(runner.game.clicks, 1);
    }
}
