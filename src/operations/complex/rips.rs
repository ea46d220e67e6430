use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::{GeometryError, Result};
use crate::math::Point3;
use crate::topology::{Filtration, Simplex, WeightedSimplex};

use super::check_finite;

/// Parameters of a Vietoris-Rips construction.
#[derive(Debug, Clone, Copy)]
pub struct RipsParams {
    /// Longest edge admitted into the complex.
    pub max_radius: f64,
    /// Highest simplex dimension generated (1 to 3).
    pub max_dim: usize,
}

impl Default for RipsParams {
    fn default() -> Self {
        Self {
            max_radius: 2.0,
            max_dim: 2,
        }
    }
}

/// Builds the Vietoris-Rips filtration of a point cloud.
///
/// Vertices enter at 0, edges at their length, and higher simplices at their
/// longest edge. The result is sorted into filtration order.
pub struct RipsComplex {
    params: RipsParams,
}

impl RipsComplex {
    /// Creates a new `RipsComplex` operation.
    #[must_use]
    pub fn new(params: RipsParams) -> Self {
        Self { params }
    }

    /// Executes the construction.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is out of range or a point has a
    /// non-finite coordinate.
    pub fn execute(&self, points: &[Point3]) -> Result<Filtration> {
        let RipsParams { max_radius, max_dim } = self.params;
        if !max_radius.is_finite() || max_radius < 0.0 {
            return Err(GeometryError::InvalidParameter {
                parameter: "max_radius",
                message: format!("{max_radius} is not a finite non-negative length"),
            }
            .into());
        }
        if !(1..=3).contains(&max_dim) {
            return Err(GeometryError::InvalidParameter {
                parameter: "max_dim",
                message: format!("{max_dim} is outside 1..=3"),
            }
            .into());
        }
        check_finite(points)?;

        // Upper neighbours: j > i within range, ascending by j.
        let neighbours: Vec<Vec<(usize, f64)>> = (0..points.len())
            .into_par_iter()
            .map(|i| {
                (i + 1..points.len())
                    .filter_map(|j| {
                        let d = nalgebra::distance(&points[i], &points[j]);
                        (d <= max_radius).then_some((j, d))
                    })
                    .collect()
            })
            .collect();

        let mut lengths: HashMap<(usize, usize), f64> = HashMap::new();
        for (i, row) in neighbours.iter().enumerate() {
            for &(j, d) in row {
                lengths.insert((i, j), d);
            }
        }

        let mut items: Vec<WeightedSimplex> = (0..points.len())
            .map(|v| WeightedSimplex::new(Simplex::vertex(v), 0.0))
            .collect();
        for (&(i, j), &d) in &lengths {
            items.push(WeightedSimplex::new(Simplex::edge(i, j), d));
        }

        if max_dim >= 2 {
            for (i, row) in neighbours.iter().enumerate() {
                for (a, &(j, dij)) in row.iter().enumerate() {
                    for &(k, dik) in &row[a + 1..] {
                        let Some(&djk) = lengths.get(&(j, k)) else {
                            continue;
                        };
                        let tri_weight = dij.max(dik).max(djk);
                        items.push(WeightedSimplex::new(Simplex::new(vec![i, j, k])?, tri_weight));

                        if max_dim >= 3 {
                            for &(l, dil) in row.iter().filter(|&&(l, _)| l > k) {
                                let (Some(&djl), Some(&dkl)) =
                                    (lengths.get(&(j, l)), lengths.get(&(k, l)))
                                else {
                                    continue;
                                };
                                let weight = tri_weight.max(dil).max(djl).max(dkl);
                                items.push(WeightedSimplex::new(
                                    Simplex::new(vec![i, j, k, l])?,
                                    weight,
                                ));
                            }
                        }
                    }
                }
            }
        }

        tracing::debug!(
            points = points.len(),
            edges = lengths.len(),
            simplices = items.len(),
            "built rips complex"
        );
        Ok(Filtration::sorted(items))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TamaError;

    fn square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn count_dim(f: &Filtration, dim: usize) -> usize {
        f.iter().filter(|e| e.simplex.dim() == dim).count()
    }

    #[test]
    fn short_radius_keeps_only_sides() {
        let params = RipsParams {
            max_radius: 1.1,
            max_dim: 2,
        };
        let f = RipsComplex::new(params).execute(&square()).unwrap();
        assert_eq!(count_dim(&f, 0), 4);
        assert_eq!(count_dim(&f, 1), 4);
        assert_eq!(count_dim(&f, 2), 0);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn long_radius_fills_the_square() {
        let params = RipsParams {
            max_radius: 1.5,
            max_dim: 3,
        };
        let f = RipsComplex::new(params).execute(&square()).unwrap();
        assert_eq!(count_dim(&f, 1), 6);
        assert_eq!(count_dim(&f, 2), 4);
        assert_eq!(count_dim(&f, 3), 1);
        assert!(f.validate().is_ok());

        let last = f.entries().last().unwrap();
        assert_eq!(last.simplex.vertices(), &[0, 1, 2, 3]);
        approx::assert_relative_eq!(last.weight, 2.0_f64.sqrt());
    }

    #[test]
    fn max_dim_one_is_a_graph() {
        let params = RipsParams {
            max_radius: 5.0,
            max_dim: 1,
        };
        let f = RipsComplex::new(params).execute(&square()).unwrap();
        assert_eq!(f.len(), 10);
    }

    #[test]
    fn rejects_bad_parameters() {
        let params = RipsParams {
            max_radius: -1.0,
            max_dim: 2,
        };
        let err = RipsComplex::new(params).execute(&square()).unwrap_err();
        assert!(matches!(
            err,
            TamaError::Geometry(GeometryError::InvalidParameter {
                parameter: "max_radius",
                ..
            })
        ));

        let params = RipsParams {
            max_radius: 1.0,
            max_dim: 4,
        };
        assert!(RipsComplex::new(params).execute(&square()).is_err());
    }

    #[test]
    fn rejects_nan_points() {
        let mut points = square();
        points[2].y = f64::NAN;
        let err = RipsComplex::new(RipsParams::default())
            .execute(&points)
            .unwrap_err();
        assert!(matches!(
            err,
            TamaError::Geometry(GeometryError::NonFinite { index: 2 })
        ));
    }
}
