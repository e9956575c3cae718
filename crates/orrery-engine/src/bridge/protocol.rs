/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 20 floats]                 view_proj (column-major) + eye
/// [Instances: max_instances × 16 floats]
/// [Lines: max_line_vertices × 7 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{LineVertex, MeshInstance};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_TRANSLUCENT_SPLIT: usize = 4;
pub const HEADER_MAX_LINE_VERTICES: usize = 5;
pub const HEADER_LINE_VERTEX_COUNT: usize = 6;
pub const HEADER_VIEWPORT_WIDTH: usize = 7;
pub const HEADER_VIEWPORT_HEIGHT: usize = 8;
pub const HEADER_MAX_EVENTS: usize = 9;
pub const HEADER_EVENT_COUNT: usize = 10;
pub const HEADER_PROTOCOL_VERSION: usize = 11;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_line_vertices: usize,
    pub max_events: usize,

    pub camera_offset: usize,
    pub instance_data_offset: usize,
    pub line_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_line_vertices: usize, max_events: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CameraUniform::FLOATS;
        let line_data_offset = instance_data_offset + max_instances * MeshInstance::FLOATS;
        let event_data_offset = line_data_offset + max_line_vertices * LineVertex::FLOATS;
        let buffer_total_floats = event_data_offset + max_events * GameEvent::FLOATS;

        Self {
            max_instances,
            max_line_vertices,
            max_events,
            camera_offset,
            instance_data_offset,
            line_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_line_vertices, config.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_layout() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());
        assert_eq!(layout.camera_offset, 16);
        assert_eq!(layout.instance_data_offset, 36);
        assert_eq!(layout.line_data_offset, 36 + 4608 * 16);
        assert_eq!(layout.event_data_offset, 36 + 4608 * 16 + 4096 * 7);
        assert_eq!(layout.buffer_total_floats, 36 + 4608 * 16 + 4096 * 7 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn sections_are_contiguous() {
        let layout = ProtocolLayout::new(10, 20, 3);
        assert_eq!(layout.line_data_offset - layout.instance_data_offset, 10 * MeshInstance::FLOATS);
        assert_eq!(layout.event_data_offset - layout.line_data_offset, 20 * LineVertex::FLOATS);
        assert_eq!(layout.buffer_total_floats - layout.event_data_offset, 3 * GameEvent::FLOATS);
    }

    #[test]
    fn header_fields_fit() {
        assert!(HEADER_PROTOCOL_VERSION < HEADER_FLOATS);
    }
}
