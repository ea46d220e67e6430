use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::FiltrationError;

/// A face of a simplicial complex, stored as sorted, duplicate-free vertex ids.
///
/// The canonical form makes equality and hashing independent of the order
/// in which the vertices were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Simplex {
    vertices: Vec<usize>,
}

impl Simplex {
    /// Creates a simplex from vertex ids in any order.
    ///
    /// # Errors
    ///
    /// Returns [`FiltrationError::EmptySimplex`] if no vertex is given.
    pub fn new(mut vertices: Vec<usize>) -> Result<Self, FiltrationError> {
        if vertices.is_empty() {
            return Err(FiltrationError::EmptySimplex);
        }
        vertices.sort_unstable();
        vertices.dedup();
        Ok(Self { vertices })
    }

    /// Creates a 0-simplex.
    #[must_use]
    pub fn vertex(v: usize) -> Self {
        Self { vertices: vec![v] }
    }

    /// Creates a 1-simplex. Passing the same id twice yields a vertex.
    #[must_use]
    pub fn edge(a: usize, b: usize) -> Self {
        match a.cmp(&b) {
            Ordering::Less => Self {
                vertices: vec![a, b],
            },
            Ordering::Greater => Self {
                vertices: vec![b, a],
            },
            Ordering::Equal => Self::vertex(a),
        }
    }

    /// The sorted vertex ids.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Dimension of the simplex (number of vertices minus one).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Returns `true` if every vertex of `self` is a vertex of `other`.
    #[must_use]
    pub fn is_face_of(&self, other: &Simplex) -> bool {
        self.vertices
            .iter()
            .all(|v| other.vertices.binary_search(v).is_ok())
    }

    /// The codimension-1 faces, each obtained by dropping one vertex.
    ///
    /// A 0-simplex has no facets.
    #[must_use]
    pub fn facets(&self) -> Vec<Simplex> {
        if self.vertices.len() < 2 {
            return Vec::new();
        }
        (0..self.vertices.len())
            .map(|skip| {
                let vertices = self
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip)
                    .map(|(_, &v)| v)
                    .collect();
                Simplex { vertices }
            })
            .collect()
    }
}

impl TryFrom<Vec<usize>> for Simplex {
    type Error = FiltrationError;

    fn try_from(vertices: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Simplex> for Vec<usize> {
    fn from(simplex: Simplex) -> Self {
        simplex.vertices
    }
}
