//! Percentage normalization and ranking of raw ending scores.
//!
//! Raw totals may be negative, so they are shifted up by the lowest negative
//! score before the separation exponent `beta` is applied. A larger `beta`
//! gives the leading ending a disproportionately larger share; `beta = 1` is
//! a plain share of the total.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::EndingId;

/// One ending's raw points and normalized percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingScore {
    pub ending_id: EndingId,
    /// Unshifted raw score.
    pub points: f64,
    /// Share of the distribution, 0-100.
    pub percentage: f64,
}

/// Convert raw scores into a percentage distribution, sorted by percentage
/// descending and then ending id ascending.
pub fn normalize(raw_scores: &BTreeMap<EndingId, f64>, beta: f64) -> Vec<EndingScore> {
    if raw_scores.is_empty() {
        return Vec::new();
    }

    let count = raw_scores.len() as f64;
    let equal_share = 100.0 / count;

    let mut values = raw_scores.values().copied();
    let first = values.next().unwrap_or(0.0);
    let all_equal = values.all(|v| v == first);

    let weighted: Vec<(EndingId, f64, f64)> = if all_equal {
        raw_scores
            .iter()
            .map(|(id, &points)| (id.clone(), points, 0.0))
            .collect()
    } else {
        let floor = raw_scores.values().copied().fold(0.0, f64::min);
        let max_shifted = raw_scores.values().map(|v| v - floor).fold(0.0, f64::max);
        raw_scores
            .iter()
            .map(|(id, &points)| {
                (id.clone(), points, separation_weight(points - floor, max_shifted, beta))
            })
            .collect()
    };

    let total: f64 = weighted.iter().map(|(_, _, w)| w).sum();

    let mut scores: Vec<EndingScore> = weighted
        .into_iter()
        .map(|(ending_id, points, w)| EndingScore {
            ending_id,
            points,
            percentage: if total > 0.0 {
                100.0 * w / total
            } else {
                equal_share
            },
        })
        .collect();

    sort_ranked(&mut scores);
    scores
}

/// `(shifted / max_shifted) ^ beta`, with zero mapping to zero for every
/// positive `beta`.
///
/// The leader's weight is exactly 1, whatever the magnitude of `beta`.
fn separation_weight(shifted: f64, max_shifted: f64, beta: f64) -> f64 {
    if shifted <= 0.0 || max_shifted <= 0.0 {
        0.0
    } else {
        (shifted / max_shifted).powf(beta)
    }
}

/// Percentage descending, then ending id ascending.
pub fn sort_ranked(scores: &mut [EndingScore]) {
    scores.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ending_id.cmp(&b.ending_id))
    });
}
