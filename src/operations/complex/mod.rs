mod alpha_2d;
mod rips;

pub use alpha_2d::AlphaComplex2D;
pub use rips::{RipsComplex, RipsParams};

use crate::error::GeometryError;
use crate::math::Point3;

/// Rejects point clouds containing NaN or infinite coordinates.
fn check_finite(points: &[Point3]) -> Result<(), GeometryError> {
    match points.iter().position(|p| p.coords.iter().any(|c| !c.is_finite())) {
        Some(index) => Err(GeometryError::NonFinite { index }),
        None => Ok(()),
    }
}
