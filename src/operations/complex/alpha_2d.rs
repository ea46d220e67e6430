use std::collections::HashMap;

use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{GeometryError, Result};
use crate::math::circle_2d::{circumradius_sq, half_length_sq, in_diametral_circle};
use crate::math::{Point2, Point3};
use crate::topology::{Filtration, Simplex, WeightedSimplex};

use super::check_finite;

/// Builds the alpha filtration of the xy projection of a point cloud.
///
/// Filtration values are squared radii: 0 for vertices, the squared
/// circumradius for triangles, and for an edge its squared half length when
/// its diametral circle is empty, otherwise the smallest value of its
/// incident triangles.
pub struct AlphaComplex2D {
    max_alpha_sq: f64,
}

struct EdgeCofaces {
    opposite: Vec<usize>,
    min_weight: f64,
}

impl AlphaComplex2D {
    /// Creates a new `AlphaComplex2D` operation keeping every simplex.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_alpha_sq: f64::INFINITY,
        }
    }

    /// Drops simplices whose squared radius exceeds `max_alpha_sq`.
    #[must_use]
    pub fn with_max_alpha_sq(mut self, max_alpha_sq: f64) -> Self {
        self.max_alpha_sq = max_alpha_sq;
        self
    }

    /// Executes the construction.
    ///
    /// Points sharing an xy position with an earlier point only contribute
    /// their vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if a point has a non-finite coordinate or the
    /// triangulation rejects a point.
    pub fn execute(&self, points: &[Point3]) -> Result<Filtration> {
        check_finite(points)?;

        let mut dt: DelaunayTriangulation<SpadePoint2<f64>> = DelaunayTriangulation::new();
        let mut handle_to_point: HashMap<usize, usize> = HashMap::with_capacity(points.len());
        for (index, p) in points.iter().enumerate() {
            let handle = dt.insert(SpadePoint2::new(p.x, p.y)).map_err(|e: InsertionError| {
                GeometryError::Triangulation(format!("insert point {index}: {e}"))
            })?;
            handle_to_point.entry(handle.index()).or_insert(index);
        }

        let point_of = |handle: FixedVertexHandle| point_index(&handle_to_point, handle);
        let planar: Vec<Point2> = points.iter().map(Point3::xy).collect();

        let mut items: Vec<WeightedSimplex> = (0..points.len())
            .map(|v| WeightedSimplex::new(Simplex::vertex(v), 0.0))
            .collect();

        let mut cofaces: HashMap<(usize, usize), EdgeCofaces> = HashMap::new();
        for face in dt.inner_faces() {
            let [a, b, c] = face.vertices();
            let ids = [point_of(a.fix())?, point_of(b.fix())?, point_of(c.fix())?];
            let weight = circumradius_sq(&planar[ids[0]], &planar[ids[1]], &planar[ids[2]]);
            for (e0, e1, opposite) in [
                (ids[0], ids[1], ids[2]),
                (ids[1], ids[2], ids[0]),
                (ids[0], ids[2], ids[1]),
            ] {
                let entry = cofaces
                    .entry((e0.min(e1), e0.max(e1)))
                    .or_insert_with(|| EdgeCofaces {
                        opposite: Vec::new(),
                        min_weight: f64::INFINITY,
                    });
                entry.opposite.push(opposite);
                entry.min_weight = entry.min_weight.min(weight);
            }
            items.push(WeightedSimplex::new(Simplex::new(ids.to_vec())?, weight));
        }

        for edge in dt.undirected_edges() {
            let [u, v] = edge.vertices();
            let (u, v) = (point_of(u.fix())?, point_of(v.fix())?);
            let (pu, pv) = (&planar[u], &planar[v]);
            let weight = match cofaces.get(&(u.min(v), u.max(v))) {
                Some(info)
                    if info
                        .opposite
                        .iter()
                        .any(|&o| in_diametral_circle(pu, pv, &planar[o])) =>
                {
                    info.min_weight
                }
                _ => half_length_sq(pu, pv),
            };
            items.push(WeightedSimplex::new(Simplex::edge(u, v), weight));
        }

        items.retain(|ws| ws.weight <= self.max_alpha_sq);
        tracing::debug!(
            points = points.len(),
            triangles = dt.num_inner_faces(),
            simplices = items.len(),
            "built planar alpha complex"
        );
        Ok(Filtration::sorted(items))
    }
}

fn point_index(handle_to_point: &HashMap<usize, usize>, handle: FixedVertexHandle) -> Result<usize> {
    handle_to_point
        .get(&handle.index())
        .copied()
        .ok_or_else(|| GeometryError::Triangulation("unmapped vertex handle".into()).into())
}

impl Default for AlphaComplex2D {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn weight_of(f: &Filtration, vertices: &[usize]) -> f64 {
        f.iter()
            .find(|e| e.simplex.vertices() == vertices)
            .map(|e| e.weight)
            .unwrap()
    }

    #[test]
    fn right_triangle_hypotenuse_is_gabriel() {
        let f = AlphaComplex2D::new()
            .execute(&[p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0)])
            .unwrap();
        assert_eq!(f.len(), 7);
        assert!(f.validate().is_ok());
        assert_relative_eq!(weight_of(&f, &[0, 1]), 1.0);
        assert_relative_eq!(weight_of(&f, &[1, 2]), 2.0, epsilon = 1e-12);
        assert_relative_eq!(weight_of(&f, &[0, 1, 2]), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn obtuse_triangle_long_edge_is_attached() {
        // The apex sits inside the diametral circle of the base.
        let f = AlphaComplex2D::new()
            .execute(&[p(0.0, 0.0), p(4.0, 0.0), p(2.0, 1.0)])
            .unwrap();
        let tri = weight_of(&f, &[0, 1, 2]);
        assert_relative_eq!(weight_of(&f, &[0, 1]), tri);
        assert!(tri > 4.0);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn threshold_drops_large_simplices() {
        let f = AlphaComplex2D::new()
            .with_max_alpha_sq(1.5)
            .execute(&[p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0)])
            .unwrap();
        assert_eq!(f.len(), 5);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn duplicate_positions_keep_only_a_vertex() {
        let f = AlphaComplex2D::new()
            .execute(&[p(0.0, 0.0), p(1.0, 0.0), Point3::new(1.0, 0.0, 5.0)])
            .unwrap();
        assert_eq!(f.len(), 4);
        assert!(f.iter().any(|e| e.simplex == Simplex::vertex(2)));
        assert!(f.validate().is_ok());
    }
}
