use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a lower or a higher raw value is preferable for a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Cost,
    Benefit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Cost => write!(f, "cost"),
            Direction::Benefit => write!(f, "benefit"),
        }
    }
}

/// The seven criteria a laptop is judged on.
///
/// Declaration order is the aggregation order used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Price,
    Memory,
    Storage,
    ProcessorScore,
    GraphicsScore,
    ScreenSize,
    Rating,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::Price,
        Criterion::Memory,
        Criterion::Storage,
        Criterion::ProcessorScore,
        Criterion::GraphicsScore,
        Criterion::ScreenSize,
        Criterion::Rating,
    ];

    /// Price is the only cost criterion.
    pub fn direction(self) -> Direction {
        match self {
            Criterion::Price => Direction::Cost,
            _ => Direction::Benefit,
        }
    }

    /// Key used in config files and JSON output
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Price => "price",
            Criterion::Memory => "memory",
            Criterion::Storage => "storage",
            Criterion::ProcessorScore => "processor_score",
            Criterion::GraphicsScore => "graphics_score",
            Criterion::ScreenSize => "screen_size",
            Criterion::Rating => "rating",
        }
    }

    /// Short human label for prompts and tables
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Price => "Price",
            Criterion::Memory => "Memory",
            Criterion::Storage => "Storage",
            Criterion::ProcessorScore => "Processor",
            Criterion::GraphicsScore => "Graphics",
            Criterion::ScreenSize => "Screen",
            Criterion::Rating => "Rating",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
