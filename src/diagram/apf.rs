use serde::Serialize;

use super::{PersistenceDiagram, INFINITY_HEADROOM};

/// Accumulated persistence function as a step curve.
///
/// Each knot `(m, apf)` gives the accumulated lifetime of all finite points
/// whose mean age is at most `m`; the curve is constant between knots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApfCurve {
    pub knots: Vec<(f64, f64)>,
}

impl ApfCurve {
    /// Value of the curve at mean age `m`.
    #[must_use]
    pub fn value_at(&self, m: f64) -> f64 {
        self.knots
            .iter()
            .take_while(|&&(knot, _)| knot <= m)
            .last()
            .map_or(0.0, |&(_, apf)| apf)
    }
}

/// Computes the accumulated persistence function of a diagram.
///
/// Points at infinity are skipped. Points sharing a mean age collapse into a
/// single knot.
#[must_use]
pub fn accumulated_persistence(diagram: &PersistenceDiagram) -> ApfCurve {
    let mut ages: Vec<(f64, f64)> = diagram
        .points()
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| (f64::midpoint(p.birth, p.death), p.lifetime()))
        .collect();
    ages.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut knots: Vec<(f64, f64)> = Vec::with_capacity(ages.len());
    let mut total = 0.0;
    for (m, lifetime) in ages {
        total += lifetime;
        match knots.last_mut() {
            Some(last) if last.0.total_cmp(&m).is_eq() => last.1 = total,
            _ => knots.push((m, total)),
        }
    }
    ApfCurve { knots }
}

/// Extends every curve to a shared right end so they plot over one range.
///
/// The end is the ceiling of [`INFINITY_HEADROOM`] times the largest final
/// mean age; each non-empty curve gains a knot there holding its last value.
pub fn pad_curves(curves: &mut [ApfCurve]) {
    let Some(last_m) = curves
        .iter()
        .filter_map(|c| c.knots.last().map(|&(m, _)| m))
        .max_by(f64::total_cmp)
    else {
        return;
    };
    let end = (last_m * INFINITY_HEADROOM).ceil();
    for curve in curves.iter_mut() {
        if let Some(&(m, apf)) = curve.knots.last() {
            if m < end {
                curve.knots.push((end, apf));
            }
        }
    }
}
