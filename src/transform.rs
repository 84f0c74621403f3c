//! Time-driven values animated by the later steps.

use glam::{Mat4, Vec3};

/// Green channel of the `shaders` step, pulsing between 0 and 1.
#[must_use]
pub fn pulse(seconds: f32) -> f32 {
    seconds.sin() / 2.0 + 0.5
}

/// Model transform of the `animation` step: moved to the bottom-right
/// quadrant, then spun around Z at one radian per second.
#[must_use]
pub fn spin(seconds: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.5, -0.5, 0.0)) * Mat4::from_rotation_z(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn pulse_stays_in_unit_range() {
        for i in 0..100 {
            #[expect(clippy::cast_precision_loss)]
            let v = pulse(i as f32 * 0.37);
            assert!((0.0..=1.0).contains(&v), "{v}");
        }
        assert!((pulse(0.0) - 0.5).abs() < 1e-6);
        assert!((pulse(FRAC_PI_2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spin_at_zero_only_translates() {
        let moved = spin(0.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(approx(moved, Vec4::new(0.5, -0.5, 0.0, 1.0)));
    }

    #[test]
    fn spin_rotates_before_translating() {
        // A quarter turn maps +X to +Y, then the translation applies.
        let moved = spin(FRAC_PI_2) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx(moved, Vec4::new(0.5, 0.5, 0.0, 1.0)));

        let moved = spin(PI) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx(moved, Vec4::new(-0.5, -0.5, 0.0, 1.0)));
    }
}
