use super::{Point2, TOLERANCE};

/// Squared circumradius of the triangle `abc`.
///
/// Returns `f64::INFINITY` for (nearly) collinear points.
#[must_use]
pub fn circumradius_sq(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let cross = ab.perp(&ac);
    if cross.abs() < TOLERANCE {
        return f64::INFINITY;
    }
    // |ab|^2 |ac|^2 |bc|^2 / (4 * area)^2 with area = cross / 2.
    let bc = c - b;
    ab.norm_squared() * ac.norm_squared() * bc.norm_squared() / (4.0 * cross * cross)
}

/// Squared radius of the smallest circle through `a` and `b`.
#[must_use]
pub fn half_length_sq(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm_squared() / 4.0
}

/// Returns `true` if `p` lies strictly inside the circle with diameter `ab`.
#[must_use]
pub fn in_diametral_circle(a: &Point2, b: &Point2, p: &Point2) -> bool {
    // Thales: the angle apb is obtuse exactly when p is inside.
    (a - p).dot(&(b - p)) < -TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn right_triangle_circumradius_is_half_hypotenuse() {
        let r2 = circumradius_sq(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(0.0, 2.0),
        );
        assert_relative_eq!(r2, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_have_infinite_circumradius() {
        let r2 = circumradius_sq(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!(r2.is_infinite());
    }

    #[test]
    fn diametral_circle_contains_midpoint_offset() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        assert!(in_diametral_circle(&a, &b, &Point2::new(1.0, 0.5)));
        assert!(!in_diametral_circle(&a, &b, &Point2::new(1.0, 1.0)));
        assert!(!in_diametral_circle(&a, &b, &Point2::new(1.0, 3.0)));
        assert_relative_eq!(half_length_sq(&a, &b), 1.0);
    }
}
