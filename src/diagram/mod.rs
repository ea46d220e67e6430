mod apf;

pub use apf::{accumulated_persistence, pad_curves, ApfCurve};

use serde::{Deserialize, Serialize};

use crate::error::DiagramError;

/// Factor applied to the largest finite value when placing points at infinity.
pub const INFINITY_HEADROOM: f64 = 1.1;

/// A (birth, death) pair; `death` may be `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramPoint {
    pub birth: f64,
    pub death: f64,
}

impl DiagramPoint {
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.death.is_finite()
    }

    #[must_use]
    pub fn lifetime(&self) -> f64 {
        self.death - self.birth
    }
}

/// A persistence diagram computed by an external reduction.
///
/// Deserializes from a list of `[birth, death]` pairs where a `null` death
/// stands for infinity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<(f64, Option<f64>)>")]
pub struct PersistenceDiagram {
    points: Vec<DiagramPoint>,
}

/// Whether a plotted point stands for an infinite death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Finite,
    Infinite,
}

/// A diagram point with infinite deaths moved to a finite height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub birth: f64,
    pub death: f64,
    pub kind: PointKind,
}

impl PersistenceDiagram {
    /// Creates a diagram from `(birth, death)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is NaN or a pair is born after it dies.
    pub fn new(pairs: Vec<(f64, f64)>) -> Result<Self, DiagramError> {
        let mut points = Vec::with_capacity(pairs.len());
        for (index, (birth, death)) in pairs.into_iter().enumerate() {
            if birth.is_nan() || death.is_nan() {
                return Err(DiagramError::NotANumber { index });
            }
            if birth > death {
                return Err(DiagramError::InvertedPair {
                    index,
                    birth,
                    death,
                });
            }
            points.push(DiagramPoint { birth, death });
        }
        Ok(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &[DiagramPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest finite death, if any.
    #[must_use]
    pub fn max_finite_death(&self) -> Option<f64> {
        self.points
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| p.death)
            .max_by(f64::total_cmp)
    }

    /// Largest finite birth, if any.
    #[must_use]
    pub fn max_birth(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.birth)
            .filter(|b| b.is_finite())
            .max_by(f64::total_cmp)
    }

    /// Places each point for plotting; infinite deaths are drawn at `cap`.
    #[must_use]
    pub fn plot_points(&self, cap: f64) -> Vec<PlotPoint> {
        self.points
            .iter()
            .map(|p| {
                if p.is_finite() {
                    PlotPoint {
                        birth: p.birth,
                        death: p.death,
                        kind: PointKind::Finite,
                    }
                } else {
                    PlotPoint {
                        birth: p.birth,
                        death: cap,
                        kind: PointKind::Infinite,
                    }
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<(f64, Option<f64>)>> for PersistenceDiagram {
    type Error = DiagramError;

    fn try_from(pairs: Vec<(f64, Option<f64>)>) -> Result<Self, Self::Error> {
        Self::new(
            pairs
                .into_iter()
                .map(|(birth, death)| (birth, death.unwrap_or(f64::INFINITY)))
                .collect(),
        )
    }
}

/// Common height for infinite points across several diagrams.
///
/// [`INFINITY_HEADROOM`] times the largest finite death, falling back to the
/// largest birth when no point dies. `None` when every diagram is empty.
#[must_use]
pub fn infinity_cap(diagrams: &[PersistenceDiagram]) -> Option<f64> {
    let max_death = diagrams
        .iter()
        .filter_map(PersistenceDiagram::max_finite_death)
        .max_by(f64::total_cmp);
    let reference = max_death.or_else(|| {
        diagrams
            .iter()
            .filter_map(PersistenceDiagram::max_birth)
            .max_by(f64::total_cmp)
    })?;
    Some(reference * INFINITY_HEADROOM)
}

/// Plot-ready view of several diagrams sharing one infinity height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramSummary {
    /// Height used for infinite points; absent when all diagrams are empty.
    pub cap: Option<f64>,
    /// Name of each diagram, parallel to `points` and `apf`.
    pub labels: Vec<String>,
    pub points: Vec<Vec<PlotPoint>>,
    /// Accumulated persistence functions, padded to a common range.
    pub apf: Vec<ApfCurve>,
}

/// Prepares diagrams for plotting side by side, labelled by their index.
#[must_use]
pub fn summarize(diagrams: &[PersistenceDiagram]) -> DiagramSummary {
    let labels = (0..diagrams.len()).map(|i| i.to_string()).collect();
    build_summary(diagrams, labels)
}

/// Prepares diagrams for plotting side by side under the given names.
///
/// # Errors
///
/// Returns [`DiagramError::LabelCount`] unless there is one label per diagram.
pub fn summarize_labeled<S>(
    diagrams: &[PersistenceDiagram],
    labels: &[S],
) -> Result<DiagramSummary, DiagramError>
where
    S: AsRef<str>,
{
    if labels.len() != diagrams.len() {
        return Err(DiagramError::LabelCount {
            diagrams: diagrams.len(),
            labels: labels.len(),
        });
    }
    let labels = labels.iter().map(|l| l.as_ref().to_owned()).collect();
    Ok(build_summary(diagrams, labels))
}

/// Prepares the three diagrams of a kernel/image/cokernel reduction.
#[must_use]
pub fn summarize_kernel_image_cokernel(
    kernel: PersistenceDiagram,
    image: PersistenceDiagram,
    cokernel: PersistenceDiagram,
) -> DiagramSummary {
    build_summary(
        &[kernel, image, cokernel],
        ["kernel", "image", "cokernel"].map(String::from).to_vec(),
    )
}

fn build_summary(diagrams: &[PersistenceDiagram], labels: Vec<String>) -> DiagramSummary {
    let cap = infinity_cap(diagrams);
    let points = diagrams
        .iter()
        .map(|d| d.plot_points(cap.unwrap_or(f64::INFINITY)))
        .collect();
    let mut apf: Vec<ApfCurve> = diagrams.iter().map(accumulated_persistence).collect();
    pad_curves(&mut apf);
    DiagramSummary {
        cap,
        labels,
        points,
        apf,
    }
}
