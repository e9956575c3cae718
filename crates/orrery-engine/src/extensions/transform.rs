// extensions/transform.rs
//
// Transform hierarchy extension — tracks parent-child relationships by EntityId.
// Decoupled from Entity/Scene internals.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.register_with(group, LocalTransform::new().with_offset(orbit_pos));
//   graph.register(planet);
//   graph.set_parent(planet, Some(group));
//   graph.propagate(&mut scene);  // writes world pos/rotation/scale into entities

use std::collections::HashMap;
use glam::{Affine3A, Quat, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Local transform relative to the parent (or world for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub offset: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
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

    fn matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.offset)
    }
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: LocalTransform,
}

/// Transform hierarchy graph: star-system groups carrying planets, rings,
/// atmospheres, moons and satellites.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
    /// Entities with no parent, in registration order.
    roots: Vec<EntityId>,
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with an identity local transform.
    pub fn register(&mut self, id: EntityId) {
        self.register_with(id, LocalTransform::default());
    }

    /// Register an entity with a specific local transform.
    pub fn register_with(&mut self, id: EntityId, local: LocalTransform) {
        let node = self.nodes.entry(id).or_default();
        node.local = local;
        if node.parent.is_none() && !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Set the parent of an entity. Pass `None` to make it a root.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        self.nodes.entry(child).or_default();
        if let Some(p) = parent {
            self.nodes.entry(p).or_default();
        }

        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
                if !self.nodes.get(&p).is_some_and(|n| n.parent.is_some()) && !self.roots.contains(&p) {
                    self.roots.push(p);
                }
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
        self.dirty = true;
    }

    pub fn get_local(&self, id: EntityId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    /// Mutable local transform; marks the graph dirty.
    pub fn get_local_mut(&mut self, id: EntityId) -> Option<&mut LocalTransform> {
        let node = self.nodes.get_mut(&id)?;
        self.dirty = true;
        Some(&mut node.local)
    }

    pub fn get_parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn get_children(&self, id: EntityId) -> Option<&[EntityId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Write world transforms into scene entities, roots first.
    pub fn propagate(&mut self, scene: &mut Scene) {
        if !self.dirty {
            return;
        }
        for &root in &self.roots {
            self.propagate_recursive(root, Affine3A::IDENTITY, scene);
        }
        self.dirty = false;
    }

    fn propagate_recursive(&self, id: EntityId, parent_world: Affine3A, scene: &mut Scene) {
        let Some(node) = self.nodes.get(&id) else { return };
        let world = parent_world * node.local.matrix();

        if let Some(entity) = scene.get_mut(id) {
            let (scale, rotation, translation) = world.to_scale_rotation_translation();
            entity.pos = translation;
            entity.rotation = rotation;
            entity.scale = scale;
        }

        for &child in &node.children {
            self.propagate_recursive(child, world, scene);
        }
    }

    /// World-space position of `id` computed from the graph alone.
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        let mut node = self.nodes.get(&id)?;
        let mut world = node.local.matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(&parent)?;
            world = node.local.matrix() * world;
        }
        Some(world.translation.into())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn parent_child_relationship() {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);
        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent));

        assert_eq!(graph.get_parent(child), Some(parent));
        assert_eq!(graph.get_children(parent), Some([child].as_slice()));
        assert_eq!(graph.roots, vec![parent]);
    }

    #[test]
    fn child_follows_parent_rotation() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let group = EntityId(1);
        let moon = EntityId(2);
        scene.spawn(Entity::new(group));
        scene.spawn(Entity::new(moon));

        graph.register_with(
            group,
            LocalTransform::new()
                .with_offset(Vec3::new(100.0, 0.0, 0.0))
                .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        );
        graph.register_with(moon, LocalTransform::new().with_offset(Vec3::new(0.0, 10.0, 0.0)));
        graph.set_parent(moon, Some(group));
        graph.propagate(&mut scene);

        // +Y rotated +90° about X points along +Z.
        let pos = scene.get(moon).map(|e| e.pos).unwrap_or_default();
        assert!((pos - Vec3::new(100.0, 0.0, 10.0)).length() < 1e-4, "pos = {pos}");
        assert_eq!(graph.world_position(moon).map(|p| (p - pos).length() < 1e-4), Some(true));
        assert!(!graph.is_dirty());
    }

    #[test]
    fn local_edits_mark_dirty() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id));
        graph.register(id);
        graph.propagate(&mut scene);

        if let Some(local) = graph.get_local_mut(id) {
            local.offset = Vec3::new(0.0, 0.0, 5.0);
        }
        assert!(graph.is_dirty());
        graph.propagate(&mut scene);
        assert_eq!(scene.get(id).map(|e| e.pos), Some(Vec3::new(0.0, 0.0, 5.0)));
    }
}
