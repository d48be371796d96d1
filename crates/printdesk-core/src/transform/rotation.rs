//! Rotation angle arithmetic and rotated bounding boxes.
//!
//! Angles are in degrees. With the y axis pointing down (screen and page
//! space), a positive angle turns the object clockwise.

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Non-finite input normalizes to 0 so a bad delta can never poison an
/// object's transform.
pub fn normalize_angle(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Compute the size of the axis-aligned box enclosing a rotated rectangle.
///
/// # Arguments
///
/// * `width` - Rectangle width
/// * `height` - Rectangle height
/// * `angle_degrees` - Rotation angle in degrees
///
/// # Returns
///
/// Tuple of (bounding_width, bounding_height).
pub fn compute_rotated_bounds(width: f64, height: f64, angle_degrees: f64) -> (f64, f64) {
    let angle = normalize_angle(angle_degrees);

    // Fast paths for quarter turns, which the toolbar produces
    if angle.abs() < 0.001 || (angle - 180.0).abs() < 0.001 {
        return (width, height);
    }
    if (angle - 90.0).abs() < 0.001 || (angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    let angle_rad = angle.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    (width * cos + height * sin, width * sin + height * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_positive_overflow() {
        assert_eq!(normalize_angle(450.0), 90.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(720.0), 0.0);
    }

    #[test]
    fn test_normalize_negative() {
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(-360.0), 0.0);
        assert_eq!(normalize_angle(-450.0), 270.0);
    }

    #[test]
    fn test_normalize_tiny_negative() {
        let angle = normalize_angle(-1e-20);
        assert!((0.0..360.0).contains(&angle));
    }

    #[test]
    fn test_normalize_non_finite() {
        assert_eq!(normalize_angle(f64::NAN), 0.0);
        assert_eq!(normalize_angle(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_90_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100.0, 50.0, 90.0), (50.0, 100.0));
        assert_eq!(compute_rotated_bounds(100.0, 50.0, -90.0), (50.0, 100.0));
    }

    #[test]
    fn test_180_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100.0, 50.0, 180.0), (100.0, 50.0));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100.0, 100.0, 45.0);
        // Diagonal of 100x100 square is ~141.4
        assert!((w - 141.42).abs() < 0.01, "width was {}", w);
        assert!((h - 141.42).abs() < 0.01, "height was {}", h);
    }

    #[test]
    fn test_negative_rotation_bounds() {
        let a = compute_rotated_bounds(100.0, 50.0, 30.0);
        let b = compute_rotated_bounds(100.0, 50.0, -30.0);
        assert!((a.0 - b.0).abs() < 1e-9);
        assert!((a.1 - b.1).abs() < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: normalized angles are always in [0, 360).
        #[test]
        fn prop_normalized_in_range(angle in -1.0e6f64..1.0e6) {
            let n = normalize_angle(angle);
            prop_assert!((0.0..360.0).contains(&n), "{} -> {}", angle, n);
        }

        /// Property: rotating by d1 then d2 equals rotating by d1 + d2.
        #[test]
        fn prop_rotation_additive(
            start in -720.0f64..720.0,
            d1 in -720.0f64..720.0,
            d2 in -720.0f64..720.0,
        ) {
            let stepwise = normalize_angle(normalize_angle(start + d1) + d2);
            let combined = normalize_angle(start + d1 + d2);
            let diff = (stepwise - combined).abs();
            // Either equal or on opposite sides of the 0/360 seam
            prop_assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "{} vs {}", stepwise, combined);
        }

        /// Property: the rotated box always encloses the original rectangle's area.
        #[test]
        fn prop_bounds_never_shrink_area(
            (w, h) in (1.0f64..500.0, 1.0f64..500.0),
            angle in -360.0f64..360.0,
        ) {
            let (bw, bh) = compute_rotated_bounds(w, h, angle);
            prop_assert!(bw * bh >= w * h - 1e-6);
        }
    }
}
