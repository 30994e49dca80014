//! Operator commands and their plain-text output.

use std::fmt::Write;

use league_pairing::{
    ErrorKind, PairingId, Phase, Points, Tournament, TournamentError, TournamentResult,
};
use pico_args::Arguments;

/// One invocation of the binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init { name: String, force: bool },
    Add {
        name: String,
        list: Option<String>,
        anchor: bool,
    },
    Remove { name: String },
    Advance,
    NextRound,
    Pair,
    PairManual { a: String, b: String },
    Unpair { name: String },
    Bye { name: String },
    Assign,
    Result {
        id: PairingId,
        player1_score: Points,
        player2_score: Points,
    },
    ListScore { list: String, points: Points },
    Players,
    Pairings,
    Standings,
    Status,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No command given, see --help")]
    Missing,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Unexpected arguments: {0:?}")]
    Unexpected(Vec<std::ffi::OsString>),

    #[error(transparent)]
    Args(#[from] pico_args::Error),
}

impl Command {
    /// Parse the subcommand and its arguments. Global options must already
    /// have been taken out of `args`.
    pub fn parse(mut args: Arguments) -> Result<Self, CommandError> {
        let name = args.subcommand()?.ok_or(CommandError::Missing)?;
        let command = match name.as_str() {
            "init" => Command::Init {
                name: args
                    .opt_value_from_str("--name")?
                    .unwrap_or_else(|| "League".to_string()),
                force: args.contains("--force"),
            },
            "add" => {
                let list = args.opt_value_from_str("--list")?;
                let anchor = args.contains("--anchor");
                Command::Add {
                    name: args.free_from_str()?,
                    list,
                    anchor,
                }
            }
            "remove" => Command::Remove {
                name: args.free_from_str()?,
            },
            "advance" => Command::Advance,
            "next-round" => Command::NextRound,
            "pair" => Command::Pair,
            "pair-manual" => Command::PairManual {
                a: args.free_from_str()?,
                b: args.free_from_str()?,
            },
            "unpair" => Command::Unpair {
                name: args.free_from_str()?,
            },
            "bye" => Command::Bye {
                name: args.free_from_str()?,
            },
            "assign" => Command::Assign,
            "result" => Command::Result {
                id: args.free_from_str()?,
                player1_score: args.free_from_str()?,
                player2_score: args.free_from_str()?,
            },
            "list-score" => Command::ListScore {
                list: args.free_from_str()?,
                points: args.free_from_str()?,
            },
            "players" => Command::Players,
            "pairings" => Command::Pairings,
            "standings" => Command::Standings,
            "status" => Command::Status,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        let rest = args.finish();
        if !rest.is_empty() {
            return Err(CommandError::Unexpected(rest));
        }
        Ok(command)
    }

    /// Whether the command changes the tournament and needs a save
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::Players | Command::Pairings | Command::Standings | Command::Status
        )
    }

    /// Run against a loaded tournament. `Init` is handled by the caller.
    pub fn run(&self, tournament: &mut Tournament) -> TournamentResult<String> {
        match self {
            Command::Init { .. } => Ok(render_status(tournament)),
            Command::Add { name, list, anchor } => {
                tournament.add_player(name, list.as_deref(), *anchor)?;
                Ok(format!("Registered {name}"))
            }
            Command::Remove { name } => {
                tournament.remove_player(name)?;
                Ok(format!("Removed {name}"))
            }
            Command::Advance => {
                let phase = tournament.advance()?;
                Ok(format!("Round {}: {phase}", tournament.round()))
            }
            Command::NextRound => {
                let round = tournament.next_round()?;
                Ok(format!("Round {round}: {}", tournament.current()))
            }
            Command::Pair => {
                tournament.generate_pairings()?;
                Ok(render_pairings(tournament))
            }
            Command::PairManual { a, b } => {
                let id = tournament.pair_players(a, b)?;
                Ok(format!("Pairing {id}: {a} vs {b}"))
            }
            Command::Unpair { name } => Ok(match tournament.unpair_player(name)? {
                Some(pairing) => format!(
                    "Dissolved {} vs {}",
                    pairing.player1, pairing.player2
                ),
                None => format!("Withdrew the bye from {name}"),
            }),
            Command::Bye { name } => {
                tournament.set_bye(name)?;
                Ok(format!("Bye for {name}"))
            }
            Command::Assign => {
                let assignments = tournament.assign_tables()?;
                let mut out = String::new();
                for assignment in assignments {
                    let _ = writeln!(
                        out,
                        "Table {:>3}  {}{}",
                        assignment.table,
                        assignment.players.join(" vs "),
                        if assignment.is_bye() { " (bye)" } else { "" }
                    );
                }
                Ok(out.trim_end().to_string())
            }
            Command::Result {
                id,
                player1_score,
                player2_score,
            } => {
                tournament.submit_result(*id, *player1_score, *player2_score)?;
                Ok(format!("Recorded {id}: {player1_score}-{player2_score}"))
            }
            Command::ListScore { list, points } => {
                let credited = tournament.submit_list_score(list, *points)?;
                Ok(format!(
                    "Credited {points} to {}",
                    credited.join(", ")
                ))
            }
            Command::Players => Ok(render_players(tournament)),
            Command::Pairings => Ok(render_pairings(tournament)),
            Command::Standings => Ok(render_standings(tournament)),
            Command::Status => Ok(render_status(tournament)),
        }
    }
}

pub fn render_players(tournament: &Tournament) -> String {
    let mut out = String::new();
    for player in tournament.list_players() {
        let _ = writeln!(
            out,
            "{:<20} {:<12} {:<6} {:>5}  byes {}",
            player.name(),
            player.owned_list().unwrap_or("-"),
            if player.is_anchor() { "anchor" } else { "" },
            player.total_points(),
            player.byes()
        );
    }
    if out.is_empty() {
        return "No players registered".to_string();
    }
    out.trim_end().to_string()
}

pub fn render_pairings(tournament: &Tournament) -> String {
    let Some(round) = tournament.current_round() else {
        return "No round in progress".to_string();
    };

    let mut out = String::new();
    for pairing in &round.pairings {
        let result = pairing
            .result
            .map(|r| format!("{}-{}", r.player1_score, r.player2_score))
            .unwrap_or_else(|| "pending".to_string());
        let _ = writeln!(
            out,
            "{:<6} {} vs {}  [{result}]{}",
            pairing.id.to_string(),
            pairing.player1,
            pairing.player2,
            if pairing.repeat { " (repeat)" } else { "" }
        );
    }
    if let Some(bye) = &round.bye {
        let _ = writeln!(out, "bye    {bye}");
    }
    for warning in &round.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    let unpaired = tournament.unpaired_players();
    if matches!(tournament.current(), Phase::Pairings(_)) && !unpaired.is_empty() {
        let _ = writeln!(out, "unpaired: {}", unpaired.join(", "));
    }
    if out.is_empty() {
        return format!("Round {}: no pairings yet", round.number);
    }
    out.trim_end().to_string()
}

pub fn render_standings(tournament: &Tournament) -> String {
    let mut out = String::new();
    for (rank, player) in tournament.standings().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<20} {:>5}",
            rank + 1,
            player.name(),
            player.total_points()
        );
    }
    out.trim_end().to_string()
}

pub fn render_status(tournament: &Tournament) -> String {
    let mut out = format!(
        "{}: round {}, phase {}, {} players",
        tournament.config().name,
        tournament.round(),
        tournament.current(),
        tournament.roster().len()
    );
    if let Some(round) = tournament.current_round() {
        let pending = round.pending();
        if !pending.is_empty() && matches!(tournament.current(), Phase::Results(_)) {
            let ids: Vec<_> = pending.iter().map(ToString::to_string).collect();
            let _ = write!(out, "\nawaiting results: {}", ids.join(", "));
        }
    }
    out
}

/// Next step an operator can take after an error
pub fn hint(err: &TournamentError) -> Option<&'static str> {
    match err.kind() {
        ErrorKind::InvalidPhase => Some("run `status` to see the current phase"),
        ErrorKind::TerminalPhase => Some("use `next-round` once all results are in"),
        ErrorKind::IncompletePairing => {
            Some("pair the remaining players with `pair-manual`, `bye` or `pair`")
        }
        ErrorKind::PairingInfeasible => Some("register more players with `add`"),
        ErrorKind::NotFound => Some("run `players` or `pairings` to see valid names and ids"),
        ErrorKind::DuplicateName
        | ErrorKind::InvalidScore
        | ErrorKind::AlreadySubmitted
        | ErrorKind::InvalidInput
        | ErrorKind::InvalidState => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_pairing::LeagueConfig;

    fn parse(args: &[&str]) -> Result<Command, CommandError> {
        Command::parse(Arguments::from_vec(
            args.iter().map(std::ffi::OsString::from).collect(),
        ))
    }

    fn league() -> Tournament {
        let mut tournament = Tournament::new(LeagueConfig::named("Test")).unwrap();
        for name in ["Alice", "Bob", "Carol"] {
            Command::Add {
                name: name.to_string(),
                list: None,
                anchor: false,
            }
            .run(&mut tournament)
            .unwrap();
        }
        tournament
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse(&["add", "--list", "Red", "--anchor", "Alice"]).unwrap(),
            Command::Add {
                name: "Alice".to_string(),
                list: Some("Red".to_string()),
                anchor: true,
            }
        );
        assert_eq!(
            parse(&["add", "Bob"]).unwrap(),
            Command::Add {
                name: "Bob".to_string(),
                list: None,
                anchor: false,
            }
        );
    }

    #[test]
    fn test_parse_result() {
        assert_eq!(
            parse(&["result", "2:3", "10", "5"]).unwrap(),
            Command::Result {
                id: PairingId::new(2, 3),
                player1_score: 10,
                player2_score: 5,
            }
        );
        assert!(parse(&["result", "0:1", "1", "0"]).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(&[]), Err(CommandError::Missing)));
        assert!(matches!(parse(&["shuffle"]), Err(CommandError::Unknown(_))));
        assert!(matches!(
            parse(&["status", "extra"]),
            Err(CommandError::Unexpected(_))
        ));
        assert!(matches!(parse(&["bye"]), Err(CommandError::Args(_))));
    }

    #[test]
    fn test_read_only_commands() {
        assert!(!Command::Standings.mutates());
        assert!(!Command::Status.mutates());
        assert!(Command::Advance.mutates());
    }

    #[test]
    fn test_round_through_commands() {
        let mut tournament = league();
        Command::Advance.run(&mut tournament).unwrap();
        let pairings = Command::Pair.run(&mut tournament).unwrap();
        assert!(pairings.contains("1:1"));
        assert!(pairings.contains("bye    Carol"));

        Command::Advance.run(&mut tournament).unwrap();
        let tables = Command::Assign.run(&mut tournament).unwrap();
        assert!(tables.contains("(bye)"));
        let players = render_players(&tournament);
        assert!(
            players
                .lines()
                .any(|line| line.starts_with("Carol") && line.ends_with("byes 1"))
        );

        Command::Advance.run(&mut tournament).unwrap();
        assert!(render_status(&tournament).contains("awaiting results: 1:1"));
        Command::Result {
            id: PairingId::new(1, 1),
            player1_score: 4,
            player2_score: 2,
        }
        .run(&mut tournament)
        .unwrap();

        let standings = render_standings(&tournament);
        assert!(standings.starts_with("  1. Alice"));
        assert_eq!(
            Command::NextRound.run(&mut tournament).unwrap(),
            "Round 2: pairings"
        );
    }

    #[test]
    fn test_hints() {
        let mut tournament = league();
        let err = Command::Assign.run(&mut tournament).unwrap_err();
        assert!(hint(&err).unwrap().contains("status"));

        let err = Command::Add {
            name: "Alice".to_string(),
            list: None,
            anchor: false,
        }
        .run(&mut tournament)
        .unwrap_err();
        assert_eq!(hint(&err), None);
    }

    #[test]
    fn test_empty_renderings() {
        let tournament = Tournament::new(LeagueConfig::default()).unwrap();
        assert_eq!(render_players(&tournament), "No players registered");
        assert_eq!(render_pairings(&tournament), "No round in progress");
        assert_eq!(
            render_status(&tournament),
            "League: round 0, phase registration, 0 players"
        );
    }
}
