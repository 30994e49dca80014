//! Operator command line for a league.
//!
//! Every invocation loads the tournament snapshot, runs one command and
//! saves the snapshot again if the command changed anything.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Error, bail};
use league_pairing::{FileStore, PersistenceError, SnapshotFormat, Tournament, TournamentStore};
use log::info;
use pico_args::Arguments;

use commands::Command;
use config::CliConfig;

const HELP: &str = "\
Run a league: register players, pair rounds, seat tables and record scores

USAGE:
  lp_cli [OPTIONS] <COMMAND> [ARGS]

OPTIONS:
  --state      PATH        Snapshot file  [default: env LEAGUE_STATE_PATH or league.json]
  --format     FORMAT      json or binary [default: env LEAGUE_STATE_FORMAT or json]

FLAGS:
  -h, --help               Print help information

COMMANDS:
  init [--name NAME] [--force]     Start a new league
  add [--list LIST] [--anchor] NAME
  remove NAME
  advance                          Move to the next phase of the round
  next-round                       Start the next round from results
  pair                             Generate pairings for the round
  pair-manual A B                  Pair two players by hand
  unpair NAME                      Dissolve a player's pairing or bye
  bye NAME                         Give a player the bye
  assign                           Seat the round at tables
  result ROUND:N S1 S2             Record a pairing result
  list-score LIST POINTS           Credit list points
  players | pairings | standings | status

ENVIRONMENT:
  LEAGUE_STATE_PATH                Snapshot file
  LEAGUE_STATE_FORMAT              json or binary
  LEAGUE_PLAYERS_PER_TABLE         Seats per table for new leagues (even)
  LEAGUE_ALLOW_TIES                Accept equal scores (true/false)
  LEAGUE_MIN_PLAYERS               Players needed to start round 1
  LEAGUE_MAX_ROUNDS                Fixed league length
  LEAGUE_ANCHOR_POLICY             separate or ignore
  (League settings are read by `init` and stored in the snapshot)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let state_path: Option<PathBuf> = pargs.opt_value_from_str("--state")?;
    let format: Option<SnapshotFormat> = pargs.opt_value_from_str("--format")?;
    let command = Command::parse(pargs)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = CliConfig::from_env(state_path, format)?;
    config.validate()?;
    let store = FileStore::new(&config.state_path, config.format);

    let output = match &command {
        Command::Init { name, force } => {
            if store.exists() && !force {
                bail!(
                    "{} already holds a league, pass --force to replace it",
                    store.path().display()
                );
            }
            let tournament = Tournament::new(config.league_config(name.as_str()))?;
            store.save_tournament_state(&tournament.snapshot())?;
            info!(
                "Created league {name} at {} ({})",
                store.path().display(),
                store.format()
            );
            commands::render_status(&tournament)
        }
        command => {
            let mut tournament = match store.load_tournament() {
                Err(PersistenceError::Missing) => bail!(
                    "No league at {}, run `lp_cli init` first",
                    store.path().display()
                ),
                loaded => loaded
                    .with_context(|| format!("Cannot load {}", store.path().display()))?,
            };

            let output = match command.run(&mut tournament) {
                Ok(output) => output,
                Err(err) => match commands::hint(&err) {
                    Some(hint) => bail!("{err}\nHint: {hint}"),
                    None => return Err(err.into()),
                },
            };

            for event in tournament.drain_events() {
                info!("{event}");
            }
            if command.mutates() {
                store.save_tournament_state(&tournament.snapshot())?;
            }
            output
        }
    };

    println!("{output}");
    Ok(())
}
