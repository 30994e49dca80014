//! Tournament error types.

use thiserror::Error;

use crate::pairing::PairingId;
use crate::phase::Phase;
use crate::roster::RoundNumber;

/// Tournament errors
///
/// Every variant is recoverable at the call site. An operation that returns
/// one of these has left the tournament untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Player already registered: {0}")]
    DuplicateName(String),

    #[error("Invalid player name: {0:?}")]
    InvalidName(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Pairing not found: {0}")]
    PairingNotFound(PairingId),

    #[error("No player owns or is assigned list {0}")]
    ListNotFound(String),

    #[error("Player {0} is not in any pairing this round")]
    NotPaired(String),

    #[error("Operation not allowed in phase {actual}: expected {expected}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("Round {round} is in its final phase")]
    TerminalPhase { round: RoundNumber },

    #[error("Round {round} has unpaired players: {}", unpaired.join(", "))]
    IncompletePairing {
        round: RoundNumber,
        unpaired: Vec<String>,
    },

    #[error("Pairing needs at least {needed} eligible players, have {eligible}")]
    PairingInfeasible { needed: usize, eligible: usize },

    #[error("Player {0} cannot be paired with themselves")]
    SelfPairing(String),

    #[error("Player {0} already has a pairing or the bye this round")]
    AlreadyPaired(String),

    #[error("Cannot give {0} a bye: the roster has an even number of players")]
    ByeNotAllowed(String),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Result already submitted for pairing {0}")]
    ResultAlreadySubmitted(PairingId),

    #[error("List {list} already scored in round {round}")]
    ListScoreAlreadySubmitted { list: String, round: RoundNumber },

    #[error("Tables already assigned for round {0}")]
    TablesAlreadyAssigned(RoundNumber),

    #[error("Tables not assigned for round {0}")]
    TablesNotAssigned(RoundNumber),

    #[error("Round {round} still waits on results for {}", join_ids(pending))]
    ResultsPending {
        round: RoundNumber,
        pending: Vec<PairingId>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Inconsistent tournament state: {0}")]
    InconsistentState(String),
}

fn join_ids(ids: &[PairingId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coarse error category, for callers that map errors to their own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateName,
    NotFound,
    InvalidPhase,
    TerminalPhase,
    IncompletePairing,
    PairingInfeasible,
    InvalidScore,
    AlreadySubmitted,
    InvalidInput,
    InvalidState,
}

impl TournamentError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::DuplicateName(_) => ErrorKind::DuplicateName,
            TournamentError::PlayerNotFound(_)
            | TournamentError::PairingNotFound(_)
            | TournamentError::ListNotFound(_)
            | TournamentError::NotPaired(_) => ErrorKind::NotFound,
            TournamentError::InvalidPhase { .. }
            | TournamentError::TablesNotAssigned(_)
            | TournamentError::ResultsPending { .. } => ErrorKind::InvalidPhase,
            TournamentError::TerminalPhase { .. } => ErrorKind::TerminalPhase,
            TournamentError::IncompletePairing { .. } => ErrorKind::IncompletePairing,
            TournamentError::PairingInfeasible { .. } => ErrorKind::PairingInfeasible,
            TournamentError::InvalidScore(_) => ErrorKind::InvalidScore,
            TournamentError::ResultAlreadySubmitted(_)
            | TournamentError::ListScoreAlreadySubmitted { .. }
            | TournamentError::TablesAlreadyAssigned(_) => ErrorKind::AlreadySubmitted,
            TournamentError::InvalidName(_)
            | TournamentError::SelfPairing(_)
            | TournamentError::AlreadyPaired(_)
            | TournamentError::ByeNotAllowed(_)
            | TournamentError::InvalidConfig(_) => ErrorKind::InvalidInput,
            TournamentError::InconsistentState(_) => ErrorKind::InvalidState,
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
