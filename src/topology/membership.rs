use std::collections::HashMap;

use crate::math::Point3;

/// A vertex predicate with an explicit domain.
///
/// `contains` returns `None` for vertices outside the domain, which callers
/// report as an invalid vertex rather than treating as "not a member".
pub trait Membership: Sync {
    fn contains(&self, vertex: usize) -> Option<bool>;
}

/// Membership flags for the vertices `0..len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexMembership {
    flags: Vec<bool>,
}

impl VertexMembership {
    #[must_use]
    pub fn new(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// Evaluates `predicate` once per point; vertex ids are point indices.
    pub fn from_points<F>(points: &[Point3], predicate: F) -> Self
    where
        F: Fn(&Point3) -> bool,
    {
        Self {
            flags: points.iter().map(predicate).collect(),
        }
    }

    /// Marks a point as a member when its z coordinate lies outside
    /// `[lower, upper]`, i.e. near the top or bottom of the sample.
    #[must_use]
    pub fn outside_z_band(points: &[Point3], lower: f64, upper: f64) -> Self {
        Self::from_points(points, |p| p.z > upper || p.z < lower)
    }

    /// Number of vertices in the domain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of member vertices.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

impl Membership for VertexMembership {
    fn contains(&self, vertex: usize) -> Option<bool> {
        self.flags.get(vertex).copied()
    }
}

impl Membership for [bool] {
    fn contains(&self, vertex: usize) -> Option<bool> {
        self.get(vertex).copied()
    }
}

impl Membership for Vec<bool> {
    fn contains(&self, vertex: usize) -> Option<bool> {
        self.get(vertex).copied()
    }
}

impl<S: std::hash::BuildHasher + Sync> Membership for HashMap<usize, bool, S> {
    fn contains(&self, vertex: usize) -> Option<bool> {
        self.get(&vertex).copied()
    }
}
