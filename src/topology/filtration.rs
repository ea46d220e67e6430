use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FiltrationError, MalformedReason};

use super::Simplex;

/// A simplex together with the filtration value at which it enters.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSimplex {
    pub simplex: Simplex,
    pub weight: f64,
}

impl WeightedSimplex {
    #[must_use]
    pub fn new(simplex: Simplex, weight: f64) -> Self {
        Self { simplex, weight }
    }
}

/// One indexed entry of a [`Filtration`].
///
/// Serializes as `[id, [vertices...], weight]`, the list form consumed by
/// external reduction routines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntryRecord", into = "EntryRecord")]
pub struct FiltrationEntry {
    /// Position of the entry within its filtration.
    pub id: usize,
    pub simplex: Simplex,
    pub weight: f64,
}

#[derive(Serialize, Deserialize)]
struct EntryRecord(usize, Simplex, f64);

impl From<EntryRecord> for FiltrationEntry {
    fn from(EntryRecord(id, simplex, weight): EntryRecord) -> Self {
        Self { id, simplex, weight }
    }
}

impl From<FiltrationEntry> for EntryRecord {
    fn from(entry: FiltrationEntry) -> Self {
        Self(entry.id, entry.simplex, entry.weight)
    }
}

/// Total order used to sort simplices into filtration order.
///
/// Weight ascending, then dimension ascending, then lexicographic vertex ids.
/// With monotone weights (a face never heavier than its coface) the result
/// is a valid filtration.
#[must_use]
pub fn compare_filtration_order(a: &WeightedSimplex, b: &WeightedSimplex) -> Ordering {
    a.weight
        .total_cmp(&b.weight)
        .then_with(|| a.simplex.dim().cmp(&b.simplex.dim()))
        .then_with(|| a.simplex.cmp(&b.simplex))
}

/// Checks that every facet of every simplex appears strictly earlier and that
/// no simplex repeats.
///
/// Facets suffice: each facet is itself checked, so all lower faces are
/// covered transitively. The error names the lowest offending position.
///
/// # Errors
///
/// Returns [`FiltrationError::MalformedFiltration`] on the first violation.
pub fn validate_order<'a, I>(simplices: I) -> Result<(), FiltrationError>
where
    I: IntoIterator<Item = &'a Simplex>,
{
    let simplices: Vec<&Simplex> = simplices.into_iter().collect();
    let mut first_seen: HashMap<&Simplex, usize> = HashMap::with_capacity(simplices.len());
    for (position, &simplex) in simplices.iter().enumerate() {
        first_seen.entry(simplex).or_insert(position);
    }

    for (position, &simplex) in simplices.iter().enumerate() {
        if first_seen.get(simplex) != Some(&position) {
            return Err(malformed(position, MalformedReason::DuplicateSimplex));
        }
        for facet in simplex.facets() {
            match first_seen.get(&facet) {
                None => return Err(malformed(position, MalformedReason::MissingFace)),
                Some(&face_position) if face_position >= position => {
                    return Err(malformed(position, MalformedReason::FaceAfterCoface));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn malformed(position: usize, reason: MalformedReason) -> FiltrationError {
    FiltrationError::MalformedFiltration { position, reason }
}

/// An ordered, indexed sequence of weighted simplices.
///
/// Entry ids always equal their positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FiltrationEntry>", into = "Vec<FiltrationEntry>")]
pub struct Filtration {
    entries: Vec<FiltrationEntry>,
}

impl TryFrom<Vec<FiltrationEntry>> for Filtration {
    type Error = FiltrationError;

    fn try_from(entries: Vec<FiltrationEntry>) -> Result<Self, Self::Error> {
        if let Some((position, entry)) = entries.iter().enumerate().find(|(i, e)| e.id != *i) {
            return Err(FiltrationError::IdMismatch {
                position,
                id: entry.id,
            });
        }
        Ok(Self { entries })
    }
}

impl From<Filtration> for Vec<FiltrationEntry> {
    fn from(filtration: Filtration) -> Self {
        filtration.entries
    }
}

impl Filtration {
    /// Indexes simplices in the given order without checking it.
    #[must_use]
    pub fn from_ordered(simplices: Vec<WeightedSimplex>) -> Self {
        let entries = simplices
            .into_iter()
            .enumerate()
            .map(|(id, ws)| FiltrationEntry {
                id,
                simplex: ws.simplex,
                weight: ws.weight,
            })
            .collect();
        Self { entries }
    }

    /// Sorts simplices with [`compare_filtration_order`] and indexes them.
    #[must_use]
    pub fn sorted(mut simplices: Vec<WeightedSimplex>) -> Self {
        simplices.sort_by(compare_filtration_order);
        Self::from_ordered(simplices)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[FiltrationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FiltrationEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&FiltrationEntry> {
        self.entries.get(id)
    }

    /// Checks the closure invariant, see [`validate_order`].
    ///
    /// # Errors
    ///
    /// Returns [`FiltrationError::MalformedFiltration`] on the first violation.
    pub fn validate(&self) -> Result<(), FiltrationError> {
        validate_order(self.entries.iter().map(|e| &e.simplex))
    }

    /// Splits the filtration back into simplices and weights.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Simplex>, Vec<f64>) {
        self.entries
            .into_iter()
            .map(|e| (e.simplex, e.weight))
            .unzip()
    }
}

impl<'a> IntoIterator for &'a Filtration {
    type Item = &'a FiltrationEntry;
    type IntoIter = std::slice::Iter<'a, FiltrationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
