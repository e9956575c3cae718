use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

/// Shape codes written into `MeshInstance::shape`.
pub const SHAPE_SPHERE: f32 = 0.0;
pub const SHAPE_RING: f32 = 1.0;
pub const SHAPE_MODEL: f32 = 2.0;

/// Sentinel for "no texture / model slot".
pub const NO_SLOT: f32 = -1.0;

/// Per-instance mesh data read by the host renderer.
/// Must match the TypeScript protocol: 16 floats = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Orientation quaternion.
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// World radius (sphere), outer radius (ring) or uniform scale (model).
    pub radius: f32,
    pub shape: f32,
    /// Ring inner radius as a fraction of `radius`.
    pub inner: f32,
    /// Texture slot (sphere, ring) or model slot (model); `NO_SLOT` when absent.
    pub slot: f32,
    pub emissive: f32,
    pub opacity: f32,
    /// 1.0 draws the selection outline.
    pub outline: f32,
    /// Packed 0xRRGGBB fallback tint.
    pub tint: f32,
    pub _pad: f32,
}

impl MeshInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// A model placed directly in world space, for instances that never
    /// become scene entities.
    pub fn model(pos: Vec3, rotation: Quat, scale: f32, slot: u32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            qx: rotation.x,
            qy: rotation.y,
            qz: rotation.z,
            qw: rotation.w,
            radius: scale,
            shape: SHAPE_MODEL,
            slot: slot as f32,
            opacity: 1.0,
            // 0xFFFFFF
            tint: 16_777_215.0,
            ..Self::default()
        }
    }
}

/// One vertex of a line list (pairs of vertices form segments).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 7;
}

/// Per-frame geometry for the host renderer.
///
/// Opaque instances come first; translucent instances (atmospheres, coronas)
/// start at `translucent_split` so the host can draw them after depth is filled.
pub struct RenderBuffer {
    pub instances: Vec<MeshInstance>,
    pub translucent_split: u32,
    pub lines: Vec<LineVertex>,
    translucent: Vec<MeshInstance>,
    max_instances: usize,
    max_line_vertices: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(4608, 4096)
    }

    pub fn with_capacity(max_instances: usize, max_line_vertices: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            translucent_split: 0,
            lines: Vec::with_capacity(max_line_vertices),
            translucent: Vec::new(),
            max_instances,
            max_line_vertices,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.translucent.clear();
        self.lines.clear();
        self.translucent_split = 0;
    }

    /// Queue an instance. Instances past capacity are dropped.
    pub fn push(&mut self, instance: MeshInstance) {
        if self.instances.len() + self.translucent.len() >= self.max_instances {
            return;
        }
        if instance.opacity < 1.0 {
            self.translucent.push(instance);
        } else {
            self.instances.push(instance);
        }
    }

    /// Append one line segment. Segments past capacity are dropped whole.
    pub fn push_segment(&mut self, a: LineVertex, b: LineVertex) {
        if self.lines.len() + 2 > self.max_line_vertices {
            return;
        }
        self.lines.push(a);
        self.lines.push(b);
    }

    /// Move translucent instances behind the opaque ones and record the split.
    pub fn finish(&mut self) {
        self.translucent_split = self.instances.len() as u32;
        self.instances.append(&mut self.translucent);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_sizes() {
        assert_eq!(std::mem::size_of::<MeshInstance>(), MeshInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<LineVertex>(), LineVertex::FLOATS * 4);
    }

    #[test]
    fn finish_orders_opaque_before_translucent() {
        let mut buf = RenderBuffer::new();
        buf.push(MeshInstance { opacity: 0.5, x: 1.0, ..Default::default() });
        buf.push(MeshInstance { opacity: 1.0, x: 2.0, ..Default::default() });
        buf.push(MeshInstance { opacity: 1.0, x: 3.0, ..Default::default() });
        buf.finish();
        assert_eq!(buf.translucent_split, 2);
        let xs: Vec<f32> = buf.instances.iter().map(|i| i.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn model_instance_is_opaque() {
        let inst = MeshInstance::model(Vec3::new(1.0, 0.0, 2.0), Quat::IDENTITY, 0.9, 4);
        assert_eq!(inst.shape, SHAPE_MODEL);
        assert_eq!(inst.slot, 4.0);
        assert_eq!(inst.qw, 1.0);
        assert_eq!(inst.opacity, 1.0);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut buf = RenderBuffer::with_capacity(2, 3);
        for _ in 0..5 {
            buf.push(MeshInstance { opacity: 1.0, ..Default::default() });
            buf.push_segment(LineVertex::default(), LineVertex::default());
        }
        buf.finish();
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.line_vertex_count(), 2);
    }
}
