use std::io::Read;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ExportError, Result};
use crate::math::Point3;

/// Draws `count` points uniformly from the cube `[0, side)^3`.
///
/// The same seed always yields the same cloud.
#[must_use]
pub fn random_cloud(count: usize, side: f64, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point3::new(
                rng.gen::<f64>() * side,
                rng.gen::<f64>() * side,
                rng.gen::<f64>() * side,
            )
        })
        .collect()
}

/// Reads a JSON array of `[x, y, z]` triples.
///
/// # Errors
///
/// Returns an error if the input is not such an array.
pub fn read_points_json<R: Read>(reader: R) -> Result<Vec<Point3>> {
    let coords: Vec<[f64; 3]> = serde_json::from_reader(reader).map_err(ExportError::from)?;
    Ok(coords.into_iter().map(Point3::from).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seeded_cloud_is_reproducible_and_bounded() {
        let a = random_cloud(50, 10.0, 7);
        let b = random_cloud(50, 10.0, 7);
        assert_eq!(a, b);
        assert!(a
            .iter()
            .all(|p| p.coords.iter().all(|&c| (0.0..10.0).contains(&c))));
    }

    #[test]
    fn reads_coordinate_triples() {
        let pts = read_points_json("[[0.0, 1.0, 2.0], [3.5, 4.0, 5.0]]".as_bytes()).unwrap();
        assert_eq!(pts, vec![Point3::new(0.0, 1.0, 2.0), Point3::new(3.5, 4.0, 5.0)]);
        assert!(read_points_json("[[0.0, 1.0]]".as_bytes()).is_err());
    }
}
