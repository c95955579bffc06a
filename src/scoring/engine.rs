use super::config::WeightConfig;
use super::criteria::{Criterion, Direction};
use super::ranking::descending_ranks;
use crate::catalog::Candidate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Failures that abort a whole ranking run
#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("invalid weight configuration: {0}")]
    InvalidWeightConfiguration(String),

    #[error("no rankable laptops: {excluded} of {total} excluded for missing or invalid values")]
    NoRankableCandidates { total: usize, excluded: usize },
}

/// Why a single candidate was left out of the ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    NotNumeric { raw: String },
    DivisionByZero,
    NonPositive { value: f64 },
}

/// A candidate dropped from the ranking. Not an error; reported alongside
/// the result so callers can surface it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub id: u64,
    pub name: String,
    pub criterion: Criterion,
    pub reason: ExclusionReason,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let why = match &self.reason {
            ExclusionReason::NotNumeric { raw } => format!("{} is not a number", raw),
            ExclusionReason::DivisionByZero => "zero cost value".to_string(),
            ExclusionReason::NonPositive { value } => format!("{} is not positive", value),
        };
        write!(f, "'{}' (id {}) skipped: {} {}", self.name, self.id, self.criterion, why)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub id: u64,
    pub name: String,
    pub wp: f64,
    pub wp_rank: u32,
    pub maut: f64,
    pub maut_rank: u32,
    /// Normalized value per criterion, each in (0, 1]
    pub normalized: BTreeMap<Criterion, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    /// Surviving candidates in input order
    pub rows: Vec<RankedCandidate>,
    pub excluded: Vec<Exclusion>,
}

impl Ranking {
    /// Rows ordered by WP rank, input order breaking ties
    pub fn by_wp(&self) -> Vec<&RankedCandidate> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by_key(|r| r.wp_rank);
        rows
    }

    /// Rows ordered by MAUT rank, input order breaking ties
    pub fn by_maut(&self) -> Vec<&RankedCandidate> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by_key(|r| r.maut_rank);
        rows
    }
}

/// Rank one owner's candidates with Weighted Product and MAUT.
///
/// Every criterion in [`Criterion::ALL`] must have a weight in [0, 1]. The
/// weights are not required to total 1 here; that is checked by
/// [`validate_weights`](super::validate_weights) where they are entered.
///
/// A candidate whose value for any criterion is non-numeric, non-finite or
/// not strictly positive is excluded and listed in [`Ranking::excluded`].
/// Extremes are taken over the surviving candidates, so every normalized
/// value lies in (0, 1]:
/// - cost: `min / value`
/// - benefit: `value / max`
///
/// Then `WP = Π n_k ^ w_k` and `MAUT = Σ n_k · w_k`, aggregated in
/// criterion order so the same input always gives bit-identical output.
pub fn rank(candidates: &[Candidate], weights: &WeightConfig) -> Result<Ranking, RankError> {
    check_weights(weights)?;

    let mut survivors: Vec<(&Candidate, Vec<f64>)> = Vec::with_capacity(candidates.len());
    let mut excluded = Vec::new();

    for candidate in candidates {
        match screen(candidate, weights) {
            Ok(values) => survivors.push((candidate, values)),
            Err(exclusion) => excluded.push(exclusion),
        }
    }

    if survivors.is_empty() {
        return Err(RankError::NoRankableCandidates {
            total: candidates.len(),
            excluded: excluded.len(),
        });
    }

    let extremes: Vec<f64> = weights
        .entries()
        .enumerate()
        .map(|(k, (criterion, _, direction))| {
            let column = survivors.iter().map(|(_, values)| values[k]);
            let extreme = match direction {
                Direction::Cost => column.fold(f64::INFINITY, f64::min),
                Direction::Benefit => column.fold(f64::NEG_INFINITY, f64::max),
            };
            tracing::debug!(%criterion, %direction, extreme, "normalization bound");
            extreme
        })
        .collect();

    let mut rows: Vec<RankedCandidate> = survivors
        .iter()
        .map(|(candidate, values)| {
            let mut normalized = BTreeMap::new();
            let mut wp = 1.0;
            let mut maut = 0.0;
            for (k, (criterion, weight, direction)) in weights.entries().enumerate() {
                let n = match direction {
                    Direction::Cost => extremes[k] / values[k],
                    Direction::Benefit => values[k] / extremes[k],
                };
                wp *= n.powf(weight);
                maut += n * weight;
                normalized.insert(criterion, n);
            }
            RankedCandidate {
                id: candidate.id,
                name: candidate.name.clone(),
                wp,
                wp_rank: 0,
                maut,
                maut_rank: 0,
                normalized,
            }
        })
        .collect();

    let wp_scores: Vec<f64> = rows.iter().map(|r| r.wp).collect();
    let maut_scores: Vec<f64> = rows.iter().map(|r| r.maut).collect();
    let wp_ranks = descending_ranks(&wp_scores);
    let maut_ranks = descending_ranks(&maut_scores);
    for (row, (wp_rank, maut_rank)) in rows.iter_mut().zip(wp_ranks.into_iter().zip(maut_ranks)) {
        row.wp_rank = wp_rank;
        row.maut_rank = maut_rank;
    }

    Ok(Ranking { rows, excluded })
}

fn check_weights(weights: &WeightConfig) -> Result<(), RankError> {
    let missing = weights.missing();
    if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(|c| c.key()).collect();
        return Err(RankError::InvalidWeightConfiguration(format!(
            "missing weight for {}",
            names.join(", ")
        )));
    }

    for (criterion, weight, _) in weights.entries() {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(RankError::InvalidWeightConfiguration(format!(
                "weight for {} must be between 0 and 1, got {}",
                criterion, weight
            )));
        }
    }

    Ok(())
}

/// Coerce every weighted criterion of one candidate, in criterion order.
fn screen(candidate: &Candidate, weights: &WeightConfig) -> Result<Vec<f64>, Exclusion> {
    let exclude = |criterion, reason| Exclusion {
        id: candidate.id,
        name: candidate.name.clone(),
        criterion,
        reason,
    };

    weights
        .entries()
        .map(|(criterion, _, direction)| {
            let value = candidate.value(criterion).ok_or_else(|| {
                exclude(
                    criterion,
                    ExclusionReason::NotNumeric {
                        raw: candidate.raw(criterion).to_string(),
                    },
                )
            })?;
            if value > 0.0 {
                Ok(value)
            } else if value == 0.0 && direction == Direction::Cost {
                Err(exclude(criterion, ExclusionReason::DivisionByZero))
            } else {
                Err(exclude(criterion, ExclusionReason::NonPositive { value }))
            }
        })
        .collect()
}
