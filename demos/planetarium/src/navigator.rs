/// Camera navigator — free orbit around the star, animated approach to a
/// selected body, and animated return to the overview.
///
/// Free mode keeps position and spherical coordinates in lockstep. The two
/// transitions move the position directly, so spherical coordinates are
/// re-derived from the final position when a transition completes.

use std::f32::consts::PI;

use glam::Vec3;
use orrery_engine::{step_toward, Camera3D};

use crate::bodies::BodyId;
use crate::catalog::CameraConfig;

/// Fraction of the remaining distance covered per tick while focusing.
pub const FOCUS_LERP: f32 = 0.03;
/// Fraction of the remaining distance covered per tick while returning.
pub const RETURN_LERP: f32 = 0.05;
/// A transition completes once the camera is this close to its goal.
pub const ARRIVE_DISTANCE: f32 = 1.0;
/// Keyboard rotation step, radians.
pub const ROTATE_STEP: f32 = 0.05;
/// Keeps the camera off the poles.
pub const PHI_MARGIN: f32 = 0.1;
/// Pointer-drag orbit rate, radians per pixel.
pub const DRAG_RATE: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Focusing,
    Returning,
}

impl CameraMode {
    /// Wire code sent to the host.
    pub fn code(self) -> f32 {
        match self {
            CameraMode::Free => 0.0,
            CameraMode::Focusing => 1.0,
            CameraMode::Returning => 2.0,
        }
    }
}

/// Camera position about the origin. `theta` is measured from +Z toward +X,
/// `phi` down from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_position(p: Vec3) -> Self {
        let radius = p.length();
        if radius <= f32::EPSILON {
            return Self { radius: 0.0, theta: 0.0, phi: PI / 2.0 };
        }
        Self {
            radius,
            theta: p.x.atan2(p.z),
            phi: (p.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_position(self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        )
    }
}

pub fn clamp_phi(phi: f32) -> f32 {
    phi.clamp(PHI_MARGIN, PI - PHI_MARGIN)
}

/// The body the camera is approaching, or has arrived at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Focus {
    pub body: BodyId,
    pub destination: Vec3,
    pub look_at: Vec3,
    pub arrived: bool,
}

/// Completed transitions reported by [`CameraState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorEvent {
    Arrived(BodyId),
    Returned,
}

#[derive(Debug, Clone)]
pub struct CameraState {
    pub position: Vec3,
    pub look_target: Vec3,
    pub mode: CameraMode,
    pub focus: Option<Focus>,
    pub spherical: Spherical,
    min_radius: f32,
    max_radius: f32,
    default_position: Vec3,
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        let default_position = Vec3::from_array(config.default_position);
        Self {
            position: default_position,
            look_target: Vec3::ZERO,
            mode: CameraMode::Free,
            focus: None,
            spherical: Spherical::from_position(default_position),
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            default_position,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.mode != CameraMode::Free
    }

    /// Start approaching a body at `body_position`, stopping `offset` short of
    /// it along the current line of sight. Overwrites any approach in flight.
    /// Refused while returning.
    pub fn focus(&mut self, body: BodyId, body_position: Vec3, offset: f32) -> bool {
        if self.mode == CameraMode::Returning {
            return false;
        }
        let away = (self.position - body_position).normalize_or(Vec3::Z);
        self.look_target = body_position;
        self.focus = Some(Focus {
            body,
            destination: body_position + away * offset,
            look_at: body_position,
            arrived: false,
        });
        self.mode = CameraMode::Focusing;
        true
    }

    /// Drop the focus and glide back to the overview position.
    pub fn request_return(&mut self) {
        self.focus = None;
        self.look_target = Vec3::ZERO;
        self.mode = CameraMode::Returning;
    }

    /// Drop the focus and leave the camera where it is.
    pub fn dismiss_in_place(&mut self) {
        self.focus = None;
        if self.mode == CameraMode::Focusing {
            self.mode = CameraMode::Free;
            self.resync();
        }
    }

    /// Advance an in-flight transition by one tick.
    pub fn update(&mut self) -> Option<NavigatorEvent> {
        match self.mode {
            CameraMode::Free => None,
            CameraMode::Focusing => {
                let focus = self.focus.as_mut()?;
                self.look_target = focus.look_at;
                let (next, arrived) = step_toward(self.position, focus.destination, FOCUS_LERP, ARRIVE_DISTANCE);
                self.position = next;
                if !arrived {
                    return None;
                }
                focus.arrived = true;
                let body = focus.body;
                self.mode = CameraMode::Free;
                self.resync();
                Some(NavigatorEvent::Arrived(body))
            }
            CameraMode::Returning => {
                self.look_target = Vec3::ZERO;
                let (next, arrived) = step_toward(self.position, self.default_position, RETURN_LERP, ARRIVE_DISTANCE);
                self.position = next;
                if !arrived {
                    return None;
                }
                self.mode = CameraMode::Free;
                self.resync();
                Some(NavigatorEvent::Returned)
            }
        }
    }

    // ── Free-mode manipulation ───────────────────────────────────────

    /// Multiply the orbit radius. A radius already outside the band may only
    /// move back toward it.
    pub fn zoom(&mut self, factor: f32) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let r = self.spherical.radius;
        self.spherical.radius = (r * factor).clamp(self.min_radius.min(r), self.max_radius.max(r));
        self.apply_spherical();
        true
    }

    pub fn rotate(&mut self, d_theta: f32, d_phi: f32) -> bool {
        if self.is_transitioning() {
            return false;
        }
        self.spherical.theta += d_theta;
        self.spherical.phi = clamp_phi(self.spherical.phi + d_phi);
        self.apply_spherical();
        true
    }

    /// Pointer drag by `(dx, dy)` pixels.
    pub fn orbit_drag(&mut self, dx: f32, dy: f32) -> bool {
        self.rotate(-dx * DRAG_RATE, -dy * DRAG_RATE)
    }

    /// Move over the plane to `(x, z)`, keeping height, then face the star.
    /// Planar distance is capped at `max_distance`.
    pub fn set_planar(&mut self, x: f32, z: f32, max_distance: f32) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let mut planar = glam::Vec2::new(x, z);
        let distance = planar.length();
        if distance > max_distance && distance > 0.0 {
            planar *= max_distance / distance;
        }
        self.position.x = planar.x;
        self.position.z = planar.y;
        self.look_target = Vec3::ZERO;
        self.resync();
        true
    }

    pub fn reset_view(&mut self) -> bool {
        if self.is_transitioning() {
            return false;
        }
        self.position = self.default_position;
        self.look_target = Vec3::ZERO;
        self.resync();
        true
    }

    /// Copy pose into the render camera.
    pub fn apply_to(&self, camera: &mut Camera3D) {
        camera.position = self.position;
        camera.look_at(self.look_target);
    }

    fn apply_spherical(&mut self) {
        self.position = self.spherical.to_position();
        self.look_target = Vec3::ZERO;
    }

    fn resync(&mut self) {
        self.spherical = Spherical::from_position(self.position);
    }
}
