/// Minimap — a top-down orthographic overview drawn by the host, plus the
/// mapping from a click on it to a camera position over the orbital plane.

use glam::{Vec2, Vec3};

use crate::catalog::MinimapConfig;

/// Orthographic frustum of the overview camera, after zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapView {
    pub half_width: f32,
    pub half_height: f32,
    /// Height above the star the overview looks down from.
    pub height: f32,
}

impl MinimapView {
    pub fn from_config(config: &MinimapConfig) -> Self {
        let zoom = if config.zoom > 0.0 { config.zoom } else { 1.0 };
        Self {
            half_width: config.half_width / zoom,
            half_height: config.half_height / zoom,
            height: config.height,
        }
    }
}

/// Planar `(x, z)` target for a click at `ndc` on the minimap. The navigator
/// caps its distance from the star.
pub fn target_from_ndc(ndc: Vec2, config: &MinimapConfig) -> Vec2 {
    Vec2::new(ndc.x * config.half_width, ndc.y * config.half_height)
}

/// Where the camera marker sits: right on the camera, so the overview shows
/// it above its ground track.
pub fn indicator_position(camera: Vec3) -> Vec3 {
    camera
}
