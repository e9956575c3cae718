// extensions/mod.rs
//
// Optional extension modules for the orrery engine.
// Decoupled from core Entity/Scene — games opt in by creating these systems.

pub mod easing;
pub mod transform;

pub use easing::{lerp, lerp_vec3, step_toward};
pub use transform::{LocalTransform, TransformGraph};
