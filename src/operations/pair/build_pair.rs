use rayon::prelude::*;

use crate::error::{FiltrationError, Result};
use crate::topology::{
    validate_order, Filtration, FiltrationEntry, Membership, Simplex, WeightedSimplex,
};

/// A sub-complex filtration `L` and the full filtration `K` reordered so that
/// `L` is its prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct FiltrationPair {
    /// Simplices whose vertices are all members, in input order.
    pub l: Filtration,
    /// `L` followed by the remaining simplices, each part in input order.
    pub k: Filtration,
    /// For each id in `K`, its id in `L` if it belongs to the prefix.
    pub k_to_l: Vec<Option<usize>>,
    /// For each id in `L`, its id in `K`.
    pub l_to_k: Vec<usize>,
    /// For each input position, the id the simplex received in `K`.
    pub input_to_k: Vec<usize>,
}

impl FiltrationPair {
    /// The entries of `K` that are not in `L`.
    #[must_use]
    pub fn not_l(&self) -> &[FiltrationEntry] {
        &self.k.entries()[self.l.len()..]
    }
}

/// Splits a filtration into a sub-complex filtration and a reordered full
/// filtration for kernel/image/cokernel persistence.
pub struct BuildFiltrationPair<'a> {
    simplices: &'a [Simplex],
    weights: &'a [f64],
    validate: bool,
}

impl<'a> BuildFiltrationPair<'a> {
    /// Creates a new `BuildFiltrationPair` operation.
    ///
    /// `simplices` must already be in filtration order; `weights` runs
    /// parallel to it.
    #[must_use]
    pub fn new(simplices: &'a [Simplex], weights: &'a [f64]) -> Self {
        Self {
            simplices,
            weights,
            validate: false,
        }
    }

    /// Checks the input order before partitioning.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Executes the partition.
    ///
    /// # Errors
    ///
    /// Returns [`FiltrationError::LengthMismatch`] if simplices and weights
    /// differ in length, [`FiltrationError::InvalidVertex`] if a simplex uses
    /// a vertex outside the membership domain, and, with validation enabled,
    /// [`FiltrationError::MalformedFiltration`] if the input order is invalid.
    pub fn execute<M>(&self, membership: &M) -> Result<FiltrationPair>
    where
        M: Membership + ?Sized,
    {
        let n = self.simplices.len();
        if n != self.weights.len() {
            return Err(FiltrationError::LengthMismatch {
                simplices: n,
                weights: self.weights.len(),
            }
            .into());
        }
        if self.validate {
            validate_order(self.simplices)?;
        }

        let in_l = classify(self.simplices, membership)?;
        let l_len = in_l.iter().filter(|&&flag| flag).count();

        let mut l_items = Vec::with_capacity(l_len);
        let mut rest = Vec::with_capacity(n - l_len);
        let mut input_to_k = Vec::with_capacity(n);
        for ((simplex, &weight), flag) in self.simplices.iter().zip(self.weights).zip(in_l) {
            let item = WeightedSimplex::new(simplex.clone(), weight);
            if flag {
                input_to_k.push(l_items.len());
                l_items.push(item);
            } else {
                input_to_k.push(l_len + rest.len());
                rest.push(item);
            }
        }

        let l = Filtration::from_ordered(l_items.clone());
        let k = Filtration::from_ordered(l_items.into_iter().chain(rest).collect());
        let k_to_l = (0..k.len()).map(|id| (id < l_len).then_some(id)).collect();
        let l_to_k = (0..l_len).collect();

        tracing::debug!(
            simplices = n,
            sub_complex = l_len,
            rest = n - l_len,
            "built filtration pair"
        );

        Ok(FiltrationPair {
            l,
            k,
            k_to_l,
            l_to_k,
            input_to_k,
        })
    }
}

/// Builds the filtration pair without validating the input order.
///
/// # Errors
///
/// See [`BuildFiltrationPair::execute`].
pub fn build_pair<M>(simplices: &[Simplex], weights: &[f64], membership: &M) -> Result<FiltrationPair>
where
    M: Membership + ?Sized,
{
    BuildFiltrationPair::new(simplices, weights).execute(membership)
}

/// Flags each simplex whose vertices are all members.
///
/// Runs on the rayon pool; the flags keep input positions, and on failure the
/// lowest offending position is reported.
///
/// # Errors
///
/// Returns [`FiltrationError::InvalidVertex`] for a vertex outside the domain.
pub fn classify<M>(
    simplices: &[Simplex],
    membership: &M,
) -> std::result::Result<Vec<bool>, FiltrationError>
where
    M: Membership + ?Sized,
{
    let flags: Vec<std::result::Result<bool, FiltrationError>> = simplices
        .par_iter()
        .enumerate()
        .map(|(position, simplex)| is_all_in(simplex, position, membership))
        .collect();
    flags.into_iter().collect()
}

// Every vertex is looked up, so an unknown id is reported even after a
// non-member vertex has already decided the outcome.
fn is_all_in<M>(
    simplex: &Simplex,
    position: usize,
    membership: &M,
) -> std::result::Result<bool, FiltrationError>
where
    M: Membership + ?Sized,
{
    let mut all_in = true;
    for &vertex in simplex.vertices() {
        match membership.contains(vertex) {
            Some(flag) => all_in &= flag,
            None => return Err(FiltrationError::InvalidVertex { vertex, position }),
        }
    }
    Ok(all_in)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::{MalformedReason, TamaError};

    fn s(vertices: &[usize]) -> Simplex {
        Simplex::new(vertices.to_vec()).unwrap()
    }

    fn scenario() -> (Vec<Simplex>, Vec<f64>, HashMap<usize, bool>) {
        let simplices = vec![s(&[0]), s(&[1]), s(&[2]), s(&[0, 1]), s(&[0, 2])];
        let weights = vec![0.0, 0.0, 0.0, 0.1, 0.2];
        let membership = [(0, true), (1, true), (2, false)].into_iter().collect();
        (simplices, weights, membership)
    }

    fn rows(f: &Filtration) -> Vec<(usize, Vec<usize>, f64)> {
        f.iter()
            .map(|e| (e.id, e.simplex.vertices().to_vec(), e.weight))
            .collect()
    }

    #[test]
    fn two_member_vertices_scenario() {
        let (simplices, weights, membership) = scenario();
        let pair = build_pair(&simplices, &weights, &membership).unwrap();

        assert_eq!(
            rows(&pair.l),
            vec![(0, vec![0], 0.0), (1, vec![1], 0.0), (2, vec![0, 1], 0.1)]
        );
        assert_eq!(
            rows(&pair.k),
            vec![
                (0, vec![0], 0.0),
                (1, vec![1], 0.0),
                (2, vec![0, 1], 0.1),
                (3, vec![2], 0.0),
                (4, vec![0, 2], 0.2),
            ]
        );
        let not_l: Vec<_> = pair.not_l().iter().map(|e| e.simplex.clone()).collect();
        assert_eq!(not_l, vec![s(&[2]), s(&[0, 2])]);
        assert_eq!(pair.k_to_l, vec![Some(0), Some(1), Some(2), None, None]);
        assert_eq!(pair.l_to_k, vec![0, 1, 2]);
        assert_eq!(pair.input_to_k, vec![0, 1, 3, 2, 4]);
    }

    #[test]
    fn both_outputs_are_valid_filtrations() {
        let (simplices, weights, membership) = scenario();
        let pair = BuildFiltrationPair::new(&simplices, &weights)
            .with_validation(true)
            .execute(&membership)
            .unwrap();
        assert!(pair.l.validate().is_ok());
        assert!(pair.k.validate().is_ok());
    }

    #[test]
    fn empty_input_gives_empty_pair() {
        let pair = build_pair(&[], &[], &VertexFlags(vec![])).unwrap();
        assert!(pair.l.is_empty());
        assert!(pair.k.is_empty());
        assert!(pair.k_to_l.is_empty());
    }

    #[test]
    fn all_members_keep_input_order() {
        let (simplices, weights, _) = scenario();
        let pair = build_pair(&simplices, &weights, [true; 3].as_slice()).unwrap();
        assert_eq!(pair.l, pair.k);
        assert!(pair.not_l().is_empty());
        assert_eq!(pair.input_to_k, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn no_members_leave_k_unchanged() {
        let (simplices, weights, _) = scenario();
        let pair = build_pair(&simplices, &weights, [false; 3].as_slice()).unwrap();
        assert!(pair.l.is_empty());
        let (k_simplices, k_weights) = pair.k.into_parts();
        assert_eq!(k_simplices, simplices);
        assert_eq!(k_weights, weights);
    }

    #[test]
    fn rebuilding_is_identical() {
        let (simplices, weights, membership) = scenario();
        let a = build_pair(&simplices, &weights, &membership).unwrap();
        let b = build_pair(&simplices, &weights, &membership).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let (simplices, _, membership) = scenario();
        let err = build_pair(&simplices, &[0.0], &membership).unwrap_err();
        assert!(matches!(
            err,
            TamaError::Filtration(FiltrationError::LengthMismatch {
                simplices: 5,
                weights: 1
            })
        ));
    }

    #[test]
    fn unknown_vertex_is_reported_at_lowest_position() {
        let simplices = vec![s(&[0]), s(&[0, 7]), s(&[9])];
        let weights = vec![0.0, 1.0, 2.0];
        let err = build_pair(&simplices, &weights, [false].as_slice()).unwrap_err();
        assert!(matches!(
            err,
            TamaError::Filtration(FiltrationError::InvalidVertex {
                vertex: 7,
                position: 1
            })
        ));
    }

    #[test]
    fn validation_rejects_face_after_coface() {
        let simplices = vec![s(&[0]), s(&[0, 1]), s(&[1])];
        let weights = vec![0.0, 0.5, 0.0];
        let err = BuildFiltrationPair::new(&simplices, &weights)
            .with_validation(true)
            .execute([true, true].as_slice())
            .unwrap_err();
        assert!(matches!(
            err,
            TamaError::Filtration(FiltrationError::MalformedFiltration {
                position: 1,
                reason: MalformedReason::FaceAfterCoface
            })
        ));
    }

    #[test]
    fn without_validation_malformed_input_passes_through() {
        let simplices = vec![s(&[0]), s(&[0, 1]), s(&[1])];
        let weights = vec![0.0, 0.5, 0.0];
        let pair = build_pair(&simplices, &weights, [true, true].as_slice()).unwrap();
        assert_eq!(pair.l.len(), 3);
        assert!(pair.l.validate().is_err());
    }

    struct VertexFlags(Vec<bool>);

    impl Membership for VertexFlags {
        fn contains(&self, vertex: usize) -> Option<bool> {
            self.0.get(vertex).copied()
        }
    }

    #[test]
    fn classify_reports_unknown_vertex_without_wrapping() {
        let simplices = vec![s(&[0]), s(&[1]), s(&[0, 4])];
        let flags: std::result::Result<Vec<bool>, FiltrationError> =
            classify(&simplices, [true, false].as_slice());
        assert_eq!(
            flags,
            Err(FiltrationError::InvalidVertex {
                vertex: 4,
                position: 2
            })
        );
    }

    #[test]
    fn classify_flags_in_input_order() {
        let (simplices, _, membership) = scenario();
        assert_eq!(
            classify(&simplices, &membership).unwrap(),
            vec![true, true, false, true, false]
        );
        assert_eq!(
            classify(&simplices, &VertexFlags(vec![true, false, true])).unwrap(),
            vec![true, false, true, false, true]
        );
    }
}
