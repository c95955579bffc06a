pub mod config;
pub mod criteria;
pub mod engine;
pub mod keywords;
pub mod ranking;
pub mod validation;

pub use config::WeightConfig;
pub use criteria::{Criterion, Direction};
pub use engine::{rank, Exclusion, ExclusionReason, RankError, RankedCandidate, Ranking};
pub use validation::validate_weights;
