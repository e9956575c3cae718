/// Selection and hover — pointer position to the body under it.

use glam::Vec2;
use orrery_engine::{raycast, Camera3D, EntityId, Scene};

use crate::bodies::{BodyId, BodyRegistry};

/// Screen pixels (origin top-left, y down) to normalized device coordinates.
pub fn screen_to_ndc(screen: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(screen.x / viewport.x * 2.0 - 1.0, -(screen.y / viewport.y * 2.0 - 1.0))
}

/// Nearest body whose shell or atmosphere lies under `screen`.
pub fn pick(camera: &Camera3D, scene: &Scene, registry: &BodyRegistry, screen: Vec2, viewport: Vec2) -> Option<BodyId> {
    let ray = camera.ray_from_ndc(screen_to_ndc(screen, viewport));
    let hit = raycast(&ray, scene, registry.targets())?;
    registry.resolve(hit.entity)
}

/// The one planet shell currently outlined.
#[derive(Debug, Default)]
pub struct Hover {
    outlined: Option<EntityId>,
}

impl Hover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outline the shell of `body`, or clear when `None`.
    pub fn set(&mut self, body: Option<BodyId>, registry: &BodyRegistry, scene: &mut Scene) {
        let shell = body.and_then(|id| registry.get(id)).map(|b| b.parts.shell);
        if shell == self.outlined {
            return;
        }
        if let Some(entity) = self.outlined.and_then(|id| scene.get_mut(id)) {
            entity.highlighted = false;
        }
        if let Some(entity) = shell.and_then(|id| scene.get_mut(id)) {
            entity.highlighted = true;
        }
        self.outlined = shell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{Body, BodyParts};
    use crate::catalog::BodyConfig;
    use glam::Vec3;
    use orrery_engine::{Entity, MeshComponent};

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn config(name: &str) -> BodyConfig {
        BodyConfig {
            name: name.into(),
            size: 5.0,
            a: 50.0,
            b: 50.0,
            cx: 0.0,
            cy: 0.0,
            tilt: 0.0,
            inclination: 0.0,
            omega: 0.0,
            speed: 0.001,
            focus_offset: 20.0,
            texture: "earth_day".into(),
            atmosphere: None,
            ring: None,
            info: String::new(),
        }
    }

    /// Camera on +Z looking at the origin; Earth at the origin with an
    /// atmosphere, Mars far behind it.
    fn setup() -> (Camera3D, Scene, BodyRegistry) {
        let mut camera = Camera3D::default();
        camera.set_aspect(VIEWPORT.x, VIEWPORT.y);
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_mesh(MeshComponent::sphere(5.0)));
        scene.spawn(Entity::new(EntityId(2)).with_mesh(MeshComponent::sphere(5.1).with_opacity(0.4)));
        scene.spawn(Entity::new(EntityId(3)).with_pos(Vec3::new(0.0, 0.0, -40.0)).with_mesh(MeshComponent::sphere(8.0)));

        let mut registry = BodyRegistry::new();
        let earth = BodyParts { group: EntityId(10), shell: EntityId(1), atmosphere: Some(EntityId(2)), ring: None };
        registry.register(Body::from_config(&config("Earth"), 0.005, earth), &[EntityId(1), EntityId(2)]);
        let mars = BodyParts { group: EntityId(11), shell: EntityId(3), atmosphere: None, ring: None };
        registry.register(Body::from_config(&config("Mars"), 0.005, mars), &[EntityId(3)]);
        (camera, scene, registry)
    }

    #[test]
    fn ndc_conversion() {
        assert_eq!(screen_to_ndc(Vec2::new(400.0, 300.0), VIEWPORT), Vec2::ZERO);
        assert_eq!(screen_to_ndc(Vec2::new(0.0, 0.0), VIEWPORT), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(Vec2::new(800.0, 600.0), VIEWPORT), Vec2::new(1.0, -1.0));
        assert_eq!(screen_to_ndc(Vec2::new(5.0, 5.0), Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn atmosphere_hit_resolves_to_owner() {
        let (camera, scene, registry) = setup();
        let body = pick(&camera, &scene, &registry, Vec2::new(400.0, 300.0), VIEWPORT);
        assert_eq!(body, Some(BodyId(0)));
    }

    #[test]
    fn empty_space_misses() {
        let (camera, scene, registry) = setup();
        assert_eq!(pick(&camera, &scene, &registry, Vec2::new(5.0, 5.0), VIEWPORT), None);
        assert_eq!(pick(&camera, &scene, &BodyRegistry::new(), Vec2::new(400.0, 300.0), VIEWPORT), None);
    }

    #[test]
    fn hover_moves_outline_between_shells() {
        let (_, mut scene, registry) = setup();
        let mut hover = Hover::new();

        hover.set(Some(BodyId(0)), &registry, &mut scene);
        assert!(scene.get(EntityId(1)).unwrap().highlighted);
        assert!(!scene.get(EntityId(2)).unwrap().highlighted);

        hover.set(Some(BodyId(1)), &registry, &mut scene);
        assert!(!scene.get(EntityId(1)).unwrap().highlighted);
        assert!(scene.get(EntityId(3)).unwrap().highlighted);

        hover.set(None, &registry, &mut scene);
        assert!(!scene.get(EntityId(3)).unwrap().highlighted);
        assert_eq!(hover.outlined, None);
    }
}
