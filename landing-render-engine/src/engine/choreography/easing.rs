/// Cubic ease-in-out. Input is clamped to [0, 1].
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Cubic ease-out: fast start, smooth finish. Input is clamped to [0, 1].
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_their_endpoints() {
        for ease in [ease_in_out_cubic, ease_out_cubic] {
            assert_eq!(ease(0.0), 0.0);
            assert_eq!(ease(1.0), 1.0);
            assert_eq!(ease(-3.0), 0.0);
            assert_eq!(ease(7.0), 1.0);
        }
    }

    #[test]
    fn in_out_is_symmetric_around_midpoint() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        let a = ease_in_out_cubic(0.2);
        let b = ease_in_out_cubic(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_out_front_loads_motion() {
        assert!(ease_out_cubic(0.25) > 0.25);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }
}
