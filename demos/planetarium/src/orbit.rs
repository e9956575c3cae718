/// Orbit kinematics — pure math, no engine state.
///
/// Bodies move along rotated ellipses laid into the render plane (x, z) and
/// tilted about the X axis by their inclination. Phase advances by a fixed
/// increment per simulation tick; there is no notion of real time here.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

/// Number of segments used when sampling a closed orbit path.
pub const PATH_SEGMENTS: usize = 100;

/// A closed elliptical path in the orbital plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Semi-axis along X.
    pub a: f32,
    /// Semi-axis along Y.
    pub b: f32,
    pub cx: f32,
    pub cy: f32,
    /// Rotation about the center, radians.
    pub omega: f32,
}

impl Ellipse {
    /// Build from table values; `omega_deg` is in degrees.
    pub fn new(a: f32, b: f32, cx: f32, cy: f32, omega_deg: f32) -> Self {
        Self { a, b, cx, cy, omega: omega_deg.to_radians() }
    }

    /// Point at normalized parameter `t`, sampled as angle `2π·t` and rotated
    /// by `omega` about the center. Periodic in `t` with period 1.
    pub fn point_at(&self, t: f32) -> Vec2 {
        let angle = TAU * t.rem_euclid(1.0);
        let local = Vec2::new(self.a * angle.cos(), self.b * angle.sin());
        let (s, c) = self.omega.sin_cos();
        Vec2::new(
            local.x * c - local.y * s + self.cx,
            local.x * s + local.y * c + self.cy,
        )
    }
}

/// Map a phase in radians to the ellipse parameter `t ∈ [0, 1)`.
pub fn normalized_phase(phase: f32) -> f32 {
    phase.rem_euclid(TAU) / TAU
}

/// One tick of phase integration, wrapped into `[0, 2π)`.
pub fn advance(phase: f32, angular_speed: f32, orbit_multiplier: f32) -> f32 {
    let next = (phase + angular_speed * orbit_multiplier).rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if next >= TAU { 0.0 } else { next }
}

/// Lay a planar point into the render plane as `(x, 0, y)` and rotate it about
/// the X axis by `inclination_deg`.
pub fn incline(planar: Vec2, inclination_deg: f32) -> Vec3 {
    let (s, c) = inclination_deg.to_radians().sin_cos();
    let (y, z) = (0.0, planar.y);
    Vec3::new(planar.x, y * c - z * s, y * s + z * c)
}

/// World position of a body at `phase` on `ellipse`, tilted by `inclination_deg`.
pub fn position_at_phase(ellipse: &Ellipse, phase: f32, inclination_deg: f32) -> Vec3 {
    incline(ellipse.point_at(normalized_phase(phase)), inclination_deg)
}

/// Sample `segments + 1` points around the closed path, inclined the same way
/// as the bodies that travel on it.
pub fn sample_path(ellipse: &Ellipse, inclination_deg: f32, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| incline(ellipse.point_at(i as f32 / segments as f32), inclination_deg))
        .collect()
}

/// Circular orbit in a plane tilted by `tilt` radians:
/// `(r·cos θ, r·sin θ·sin k, r·sin θ·cos k)`.
pub fn tilted_circle(radius: f32, angle: f32, tilt: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(radius * c, radius * s * tilt.sin(), radius * s * tilt.cos())
}

/// Circular orbit skewed onto the y = z diagonal: `(r·cos θ, r·sin θ, r·sin θ)`.
pub fn skewed_circle(radius: f32, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(radius * c, radius * s, radius * s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn earth() -> Ellipse {
        Ellipse::new(90.0, 89.987, 1.5, 0.0, 0.0)
    }

    #[test]
    fn point_at_is_periodic() {
        let e = Ellipse::new(65.07, 60.0, 0.44, 2.0, 76.68);
        for i in 0..20 {
            let t = i as f32 * 0.05;
            let p = e.point_at(t);
            let q = e.point_at(t + 1.0);
            assert!(p.distance(q) < EPS, "t = {t}: {p} vs {q}");
        }
    }

    #[test]
    fn point_at_zero_sits_on_major_axis() {
        let p = earth().point_at(0.0);
        assert!((p.x - 91.5).abs() < EPS);
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn omega_rotates_about_center() {
        let e = Ellipse::new(10.0, 5.0, 3.0, 0.0, 90.0);
        let p = e.point_at(0.0);
        assert!((p.x - 3.0).abs() < EPS, "x = {}", p.x);
        assert!((p.y - 10.0).abs() < EPS, "y = {}", p.y);
    }

    #[test]
    fn degenerate_axis_collapses_to_line() {
        let e = Ellipse::new(10.0, 0.0, 0.0, 0.0, 0.0);
        let p = e.point_at(0.25);
        assert!(p.is_finite());
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut phase = 0.0;
        for _ in 0..100_000 {
            phase = advance(phase, 0.0123, 10.0);
            assert!((0.0..TAU).contains(&phase), "phase = {phase}");
        }
    }

    #[test]
    fn zero_multiplier_freezes_phase() {
        let phase = advance(1.25, 0.004, 0.0);
        assert_eq!(phase, 1.25);
    }

    #[test]
    fn thousand_ticks_reach_one_radian() {
        let e = earth();
        let mut phase = 0.0;
        for _ in 0..1000 {
            phase = advance(phase, 0.001, 1.0);
        }
        assert!((phase - 1.0).abs() < EPS, "phase = {phase}");

        let expected = incline(e.point_at(1.0 / TAU), 7.0);
        let actual = position_at_phase(&e, phase, 7.0);
        assert!(actual.distance(expected) < 0.05, "{actual} vs {expected}");
        assert!(actual.y.abs() > 1.0, "inclined orbit stays in plane: {actual}");
    }

    #[test]
    fn inclination_lifts_out_of_plane() {
        let flat = incline(Vec2::new(0.0, 10.0), 0.0);
        assert!((flat - Vec3::new(0.0, 0.0, 10.0)).length() < EPS);

        let tilted = incline(Vec2::new(0.0, 10.0), 90.0);
        assert!((tilted - Vec3::new(0.0, -10.0, 0.0)).length() < EPS);
    }

    #[test]
    fn sampled_path_is_closed() {
        let path = sample_path(&earth(), 7.0, PATH_SEGMENTS);
        assert_eq!(path.len(), PATH_SEGMENTS + 1);
        assert!(path[0].distance(path[PATH_SEGMENTS]) < EPS);
    }

    #[test]
    fn moon_circles_keep_radius() {
        let p = tilted_circle(10.0, 1.3, 5f32.to_radians());
        assert!((p.length() - 10.0).abs() < EPS);
        let q = skewed_circle(20.0, 0.0);
        assert!((q - Vec3::new(20.0, 0.0, 0.0)).length() < EPS);
    }
}
