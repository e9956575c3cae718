// extensions/easing.rs
//
// Interpolation helpers. No dependencies on Entity/Scene — just math.

use glam::Vec3;

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec3 values.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// One exponential-approach step: move `current` by `factor` of the remaining
/// distance toward `target`. Returns the new value and whether it is now
/// within `arrive_distance` of the target.
#[inline]
pub fn step_toward(current: Vec3, target: Vec3, factor: f32, arrive_distance: f32) -> (Vec3, bool) {
    let next = lerp_vec3(current, target, factor);
    (next, next.distance(target) < arrive_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp(100.0, 200.0, 1.0), 200.0);
        assert!((lerp(100.0, 200.0, 0.5) - 150.0).abs() < 1e-4);
    }

    #[test]
    fn step_toward_shrinks_gap_geometrically() {
        let target = Vec3::new(100.0, 0.0, 0.0);
        let (p, arrived) = step_toward(Vec3::ZERO, target, 0.05, 1.0);
        assert!((p.x - 5.0).abs() < 1e-4);
        assert!(!arrived);
    }

    #[test]
    fn step_toward_eventually_arrives() {
        let target = Vec3::new(-175.0, 115.0, 5.0);
        let mut p = Vec3::ZERO;
        let mut steps = 0;
        loop {
            let (next, arrived) = step_toward(p, target, 0.03, 1.0);
            p = next;
            steps += 1;
            if arrived {
                break;
            }
            assert!(steps < 1000, "never arrived");
        }
        // 0.97^n * 209.7 < 1  =>  n = 176
        assert!((170..=180).contains(&steps), "steps = {steps}");
    }
}
