//! Scoring: result validation, point totals and standings.

pub mod engine;

pub use engine::{ScoringEngine, Standings};
