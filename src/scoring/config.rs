use super::criteria::{Criterion, Direction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight configuration: one fractional weight per criterion.
///
/// Directions are not stored; they follow from the criterion (see
/// [`Criterion::direction`]).
///
/// Example YAML:
/// ```yaml
/// weights:
///   price: 0.25
///   memory: 0.15
///   storage: 0.1
///   processor_score: 0.2
///   graphics_score: 0.2
///   screen_size: 0.05
///   rating: 0.05
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct WeightConfig {
    weights: BTreeMap<Criterion, f64>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::from_percentages(&[
            (Criterion::Price, 25),
            (Criterion::Memory, 15),
            (Criterion::Storage, 10),
            (Criterion::ProcessorScore, 20),
            (Criterion::GraphicsScore, 20),
            (Criterion::ScreenSize, 5),
            (Criterion::Rating, 5),
        ])
    }
}

impl WeightConfig {
    pub fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Build from whole-number percentages, as entered by a user.
    pub fn from_percentages(entries: &[(Criterion, u32)]) -> Self {
        entries
            .iter()
            .map(|(criterion, percent)| (*criterion, f64::from(*percent) / 100.0))
            .collect()
    }

    pub fn set(&mut self, criterion: Criterion, weight: f64) {
        self.weights.insert(criterion, weight);
    }

    pub fn weight(&self, criterion: Criterion) -> Option<f64> {
        self.weights.get(&criterion).copied()
    }

    /// Criteria without a weight
    pub fn missing(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|c| !self.weights.contains_key(c))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// (criterion, weight, direction) in aggregation order
    pub fn entries(&self) -> impl Iterator<Item = (Criterion, f64, Direction)> + '_ {
        self.weights
            .iter()
            .map(|(criterion, weight)| (*criterion, *weight, criterion.direction()))
    }
}

impl FromIterator<(Criterion, f64)> for WeightConfig {
    fn from_iter<I: IntoIterator<Item = (Criterion, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}
