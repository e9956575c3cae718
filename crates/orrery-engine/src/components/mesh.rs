use glam::Vec3;

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MeshColor {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for MeshColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Geometry primitive understood by the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshShape {
    Sphere { radius: f32 },
    /// Flat annulus in the local XY plane.
    Ring { inner: f32, outer: f32 },
    /// Host-loaded model referenced by manifest slot.
    Model { slot: u32 },
    /// Closed polyline in local space.
    LineLoop { points: Vec<Vec3> },
}

/// Shape plus surface parameters for one renderable.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshComponent {
    pub shape: MeshShape,
    pub color: MeshColor,
    /// Texture slot in the asset manifest, if any.
    pub texture: Option<u32>,
    /// HDR glow multiplier; values above 1 feed the bloom pass.
    pub emissive: f32,
    /// 1.0 is opaque. Anything lower is drawn in the translucent pass.
    pub opacity: f32,
}

impl MeshComponent {
    pub fn new(shape: MeshShape) -> Self {
        Self {
            shape,
            color: MeshColor::default(),
            texture: None,
            emissive: 0.0,
            opacity: 1.0,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(MeshShape::Sphere { radius })
    }

    pub fn ring(inner: f32, outer: f32) -> Self {
        Self::new(MeshShape::Ring { inner, outer })
    }

    pub fn model(slot: u32) -> Self {
        Self::new(MeshShape::Model { slot })
    }

    pub fn line_loop(points: Vec<Vec3>) -> Self {
        Self::new(MeshShape::LineLoop { points })
    }

    pub fn with_color(mut self, color: MeshColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: Option<u32>) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Bounding radius in local units, used for picking.
    pub fn bounding_radius(&self) -> Option<f32> {
        match &self.shape {
            MeshShape::Sphere { radius } => Some(*radius),
            MeshShape::Ring { outer, .. } => Some(*outer),
            MeshShape::Model { .. } | MeshShape::LineLoop { .. } => None,
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}
