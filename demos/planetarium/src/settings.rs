/// User-tunable simulation parameters, driven by the host's control panel.

use serde::Deserialize;

/// Slider ranges exposed by the control panel.
pub const ORBIT_SPEED_RANGE: (f32, f32) = (0.0, 10.0);
pub const SPIN_SPEED_RANGE: (f32, f32) = (0.0, 10.0);
pub const STAR_BRIGHTNESS_RANGE: (f32, f32) = (1.0, 10.0);

/// Brightness at which the star's emissive intensity is exactly 5.
const REFERENCE_BRIGHTNESS: f32 = 1.9;
const REFERENCE_EMISSIVE: f32 = 5.0;
const CORONA_GLOW_SCALE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Scales every orbital phase increment. Zero freezes orbits.
    pub orbit_speed_multiplier: f32,
    /// Scales every self-rotation increment.
    pub spin_speed_multiplier: f32,
    pub star_brightness: f32,
    pub orbits_visible: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            orbit_speed_multiplier: 1.0,
            spin_speed_multiplier: 1.0,
            star_brightness: REFERENCE_BRIGHTNESS,
            orbits_visible: true,
        }
    }
}

impl GlobalSettings {
    pub fn set_orbit_speed(&mut self, value: f32) {
        self.orbit_speed_multiplier = value.clamp(ORBIT_SPEED_RANGE.0, ORBIT_SPEED_RANGE.1);
    }

    pub fn set_spin_speed(&mut self, value: f32) {
        self.spin_speed_multiplier = value.clamp(SPIN_SPEED_RANGE.0, SPIN_SPEED_RANGE.1);
    }

    pub fn set_star_brightness(&mut self, value: f32) {
        self.star_brightness = value.clamp(STAR_BRIGHTNESS_RANGE.0, STAR_BRIGHTNESS_RANGE.1);
    }

    /// Emissive intensity of the star surface.
    pub fn star_emissive(&self) -> f32 {
        self.star_brightness * (REFERENCE_EMISSIVE / REFERENCE_BRIGHTNESS)
    }

    /// Glow intensity of the corona shell.
    pub fn corona_glow(&self) -> f32 {
        self.star_brightness * CORONA_GLOW_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel() {
        let s = GlobalSettings::default();
        assert_eq!(s.orbit_speed_multiplier, 1.0);
        assert_eq!(s.spin_speed_multiplier, 1.0);
        assert_eq!(s.star_brightness, 1.9);
        assert!(s.orbits_visible);
        assert!((s.star_emissive() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn sliders_clamp_to_range() {
        let mut s = GlobalSettings::default();
        s.set_orbit_speed(25.0);
        s.set_spin_speed(-1.0);
        s.set_star_brightness(0.2);
        assert_eq!(s.orbit_speed_multiplier, 10.0);
        assert_eq!(s.spin_speed_multiplier, 0.0);
        assert_eq!(s.star_brightness, 1.0);
        assert!((s.corona_glow() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: GlobalSettings = serde_json::from_str(r#"{ "orbits_visible": false }"#).unwrap();
        assert!(!s.orbits_visible);
        assert_eq!(s.star_brightness, 1.9);
    }
}
