//! Table assignment.

pub mod engine;

pub use engine::{AssignmentEngine, TableAssignment};
