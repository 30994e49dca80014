//! Round and phase state machine.
//!
//! The tournament runs two nested machines: an outer round counter and an
//! inner cycle of four phases. Within a round the phase only moves forward.
//! A new round starts only from the results phase, through
//! [`PhaseController::begin_next_round`].

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

use crate::roster::RoundNumber;
use crate::tournament::{TournamentError, TournamentResult};

/// Behaviour shared by every phase
#[enum_dispatch]
pub trait PhaseRules {
    /// Lowercase phase name
    fn name(&self) -> &'static str;

    /// Position of the phase within a round, starting at 0
    fn ordinal(&self) -> u8;

    /// Phase reached by `advance`, if any
    fn next(&self) -> Option<Phase>;

    /// Whether players may be added or removed
    fn allows_roster_changes(&self) -> bool {
        false
    }
}

/// Players sign up; no rounds have started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registration;

/// Pairings for the current round are drafted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairings;

/// Pairings are seated at tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignments;

/// Scores for the round are collected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Results;

impl PhaseRules for Registration {
    fn name(&self) -> &'static str {
        "registration"
    }

    fn ordinal(&self) -> u8 {
        0
    }

    fn next(&self) -> Option<Phase> {
        Some(Pairings.into())
    }

    fn allows_roster_changes(&self) -> bool {
        true
    }
}

impl PhaseRules for Pairings {
    fn name(&self) -> &'static str {
        "pairings"
    }

    fn ordinal(&self) -> u8 {
        1
    }

    fn next(&self) -> Option<Phase> {
        Some(Assignments.into())
    }
}

impl PhaseRules for Assignments {
    fn name(&self) -> &'static str {
        "assignments"
    }

    fn ordinal(&self) -> u8 {
        2
    }

    fn next(&self) -> Option<Phase> {
        Some(Results.into())
    }
}

impl PhaseRules for Results {
    fn name(&self) -> &'static str {
        "results"
    }

    fn ordinal(&self) -> u8 {
        3
    }

    fn next(&self) -> Option<Phase> {
        None
    }
}

/// Current phase of a tournament
#[enum_dispatch(PhaseRules)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Registration,
    Pairings,
    Assignments,
    Results,
}

impl Default for Phase {
    fn default() -> Self {
        Registration.into()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Notification emitted on every transition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    PhaseChanged {
        round: RoundNumber,
        from: Phase,
        to: Phase,
    },
    RoundStarted(RoundNumber),
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseChanged { round, from, to } => {
                write!(f, "round {round}: {from} -> {to}")
            }
            Self::RoundStarted(round) => write!(f, "round {round} started"),
        }
    }
}

/// Owner of the round counter and current phase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseController {
    round: RoundNumber,
    phase: Phase,
    /// Transitions not yet drained by listeners. Not persisted.
    #[serde(skip)]
    events: VecDeque<PhaseEvent>,
}

impl PartialEq for PhaseController {
    fn eq(&self, other: &Self) -> bool {
        self.round == other.round && self.phase == other.phase
    }
}

impl Eq for PhaseController {}

impl PhaseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn current(&self) -> Phase {
        self.phase
    }

    /// Current round, 0 while registration is open
    pub fn round(&self) -> RoundNumber {
        self.round
    }

    /// Fail with `InvalidPhase` unless the current phase is `expected`
    pub fn require(&self, expected: impl Into<Phase>) -> TournamentResult<()> {
        let expected = expected.into();
        if self.phase == expected {
            Ok(())
        } else {
            Err(TournamentError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Phase `advance` would move to
    pub fn peek_next(&self) -> TournamentResult<Phase> {
        self.phase
            .next()
            .ok_or(TournamentError::TerminalPhase { round: self.round })
    }

    /// Move to the next phase of the round. Guards that depend on roster or
    /// round data are checked by the caller first.
    pub(crate) fn advance(&mut self) -> TournamentResult<Phase> {
        let next = self.peek_next()?;
        let from = self.phase;
        if matches!(from, Phase::Registration(_)) {
            self.round = 1;
            self.events.push_back(PhaseEvent::RoundStarted(self.round));
        }
        self.phase = next;
        self.events.push_back(PhaseEvent::PhaseChanged {
            round: self.round,
            from,
            to: next,
        });
        log::info!("Round {}: {} -> {}", self.round, from, next);
        Ok(next)
    }

    /// Leave the results phase for the pairings phase of a new round
    pub(crate) fn begin_next_round(
        &mut self,
        max_rounds: Option<RoundNumber>,
    ) -> TournamentResult<RoundNumber> {
        self.require(Results)?;
        if max_rounds.is_some_and(|max| self.round >= max) {
            return Err(TournamentError::TerminalPhase { round: self.round });
        }

        let from = self.phase;
        self.round += 1;
        self.phase = Pairings.into();
        self.events.push_back(PhaseEvent::RoundStarted(self.round));
        self.events.push_back(PhaseEvent::PhaseChanged {
            round: self.round,
            from,
            to: self.phase,
        });
        log::info!("Round {} started", self.round);
        Ok(self.round)
    }

    /// Take every pending notification
    pub fn drain_events(&mut self) -> VecDeque<PhaseEvent> {
        std::mem::take(&mut self.events)
    }
}
