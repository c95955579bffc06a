//! Rank laptops by weighted multi-criteria scoring.
//!
//! Candidates live in a per-owner [`catalog`]; weights come from the YAML
//! [`config`]. [`scoring::rank`] turns both into Weighted Product and MAUT
//! scores with ranks, and [`output`] renders or exports the result.

pub mod catalog;
pub mod config;
pub mod output;
pub mod scoring;
pub mod telemetry;
