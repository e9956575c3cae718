use glam::Vec3;

use crate::components::entity::Entity;
use crate::components::mesh::{MeshColor, MeshComponent, MeshShape};
use crate::renderer::instance::{
    LineVertex, MeshInstance, RenderBuffer, NO_SLOT, SHAPE_MODEL, SHAPE_RING, SHAPE_SPHERE,
};

/// Pack an RGB color into a single float as 0xRRGGBB (exact up to 2^24).
pub fn pack_rgb(color: MeshColor) -> f32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    ((c(color.r) << 16) | (c(color.g) << 8) | c(color.b)) as f32
}

/// Build the instance and line buffers from a set of entities.
/// Meshes become instances, line loops become closed segment lists in world space.
/// The caller finishes the buffer after any custom render pass.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities {
        if !entity.active {
            continue;
        }
        let Some(mesh) = &entity.mesh else { continue };

        match &mesh.shape {
            MeshShape::LineLoop { points } => push_line_loop(entity, mesh, points, buffer),
            shape => buffer.push(mesh_instance(entity, mesh, shape)),
        }
    }
}

fn mesh_instance(entity: &Entity, mesh: &MeshComponent, shape: &MeshShape) -> MeshInstance {
    let scale = entity.scale.max_element();
    let (code, radius, inner, slot) = match shape {
        MeshShape::Sphere { radius } => (SHAPE_SPHERE, radius * scale, 0.0, mesh.texture),
        MeshShape::Ring { inner, outer } => {
            let ratio = if *outer > 0.0 { inner / outer } else { 0.0 };
            (SHAPE_RING, outer * scale, ratio, mesh.texture)
        }
        MeshShape::Model { slot } => (SHAPE_MODEL, scale, 0.0, Some(*slot)),
        MeshShape::LineLoop { .. } => (SHAPE_SPHERE, 0.0, 0.0, None),
    };
    let q = entity.rotation;
    MeshInstance {
        x: entity.pos.x,
        y: entity.pos.y,
        z: entity.pos.z,
        qx: q.x,
        qy: q.y,
        qz: q.z,
        qw: q.w,
        radius,
        shape: code,
        inner,
        slot: slot.map_or(NO_SLOT, |s| s as f32),
        emissive: mesh.emissive,
        opacity: mesh.opacity,
        outline: if entity.highlighted { 1.0 } else { 0.0 },
        tint: pack_rgb(mesh.color),
        _pad: 0.0,
    }
}

fn push_line_loop(entity: &Entity, mesh: &MeshComponent, points: &[Vec3], buffer: &mut RenderBuffer) {
    if points.len() < 2 {
        return;
    }
    let world = entity.world_matrix();
    let vertex = |p: Vec3| {
        let w = world.transform_point3(p);
        LineVertex {
            x: w.x,
            y: w.y,
            z: w.z,
            r: mesh.color.r,
            g: mesh.color.g,
            b: mesh.color.b,
            a: mesh.opacity,
        }
    };
    for (i, &p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        buffer.push_segment(vertex(p), vertex(next));
    }
}
