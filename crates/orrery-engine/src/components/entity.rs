use glam::{Affine3A, Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// Fat Entity — a single struct with optional components.
/// Position, rotation and scale are world-space; hierarchies write them
/// through `TransformGraph::propagate`.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Orientation in world space.
    pub rotation: Quat,
    /// Scale multiplier applied to the mesh dimensions.
    pub scale: Vec3,
    /// Mesh component (optional — entities without meshes are invisible groups).
    pub mesh: Option<MeshComponent>,
    /// Draw the selection outline around this entity.
    pub highlighted: bool,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
            highlighted: false,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// World matrix built from position, rotation and scale.
    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_matrix_applies_scale_then_rotation_then_translation() {
        let e = Entity::new(EntityId(1))
            .with_pos(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::splat(2.0));
        let p = e.world_matrix().transform_point3(Vec3::X);
        // X scaled to 2, rotated +90° about Y lands on -Z.
        assert!((p - Vec3::new(10.0, 0.0, -2.0)).length() < 1e-5, "p = {p}");
    }
}
