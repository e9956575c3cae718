pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, GameEvent, Description};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, MeshShape, MeshColor};
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, TickMode};
pub use renderer::instance::{MeshInstance, LineVertex, RenderBuffer};
pub use renderer::camera::{Camera3D, CameraUniform};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::{AssetManifest, AssetKind, AssetStatus, AssetTracker};
pub use bridge::protocol::ProtocolLayout;
pub use systems::raycast::{Ray, RayHit, raycast};

// Extensions — decoupled optional systems
pub use extensions::{lerp, lerp_vec3, step_toward, TransformGraph, LocalTransform};
