//! Phase controller gating which operations are legal.

pub mod state_machine;

pub use state_machine::{
    Assignments, Pairings, Phase, PhaseController, PhaseEvent, PhaseRules, Registration, Results,
};
