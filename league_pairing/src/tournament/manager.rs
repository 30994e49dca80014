//! Tournament aggregate tying the roster, phase controller and engines together.

use std::{collections::BTreeSet, sync::Arc};

use super::{
    config::LeagueConfig,
    errors::{TournamentError, TournamentResult},
    round::RoundState,
};
use crate::assignment::{AssignmentEngine, TableAssignment};
use crate::pairing::{AnchorPolicy, Pairing, PairingEngine, PairingHistory, PairingId};
use crate::persistence::{SNAPSHOT_VERSION, TournamentState};
use crate::phase::{Assignments, Pairings, Phase, PhaseController, PhaseEvent, PhaseRules, Registration, Results};
use crate::roster::{Player, Points, RosterStore, RoundNumber, RoundRecord};
use crate::scoring::{ScoringEngine, Standings};

/// One tournament: an explicitly owned value, so several can coexist
///
/// Every mutating method either completes or returns an error with the
/// tournament unchanged.
#[derive(Debug, Clone)]
pub struct Tournament {
    config: LeagueConfig,
    roster: RosterStore,
    phase: PhaseController,
    rounds: Vec<RoundState>,
    pairing_engine: PairingEngine,
    assignment_engine: AssignmentEngine,
    scoring_engine: ScoringEngine,
}

impl Tournament {
    /// Create a tournament in the registration phase
    pub fn new(config: LeagueConfig) -> TournamentResult<Self> {
        let policy = config.anchor_policy.policy();
        Self::with_anchor_policy(config, policy)
    }

    /// Create a tournament with a custom anchor policy
    pub fn with_anchor_policy(
        config: LeagueConfig,
        policy: Arc<dyn AnchorPolicy>,
    ) -> TournamentResult<Self> {
        config.validate()?;
        Ok(Self {
            pairing_engine: PairingEngine::new(policy),
            assignment_engine: AssignmentEngine::new(config.players_per_table),
            scoring_engine: ScoringEngine::new(config.allow_ties),
            config,
            roster: RosterStore::new(),
            phase: PhaseController::new(),
            rounds: Vec::new(),
        })
    }

    /// Rebuild a tournament from a snapshot, checking it for consistency
    ///
    /// # Errors
    ///
    /// `InconsistentState` for a snapshot no sequence of operations could
    /// have produced: stale totals, rounds out of step with the phase, or
    /// pairings, byes and scores that do not fit the roster.
    pub fn from_state(state: TournamentState) -> TournamentResult<Self> {
        let policy = state.config.anchor_policy.policy();
        Self::from_state_with_policy(state, policy)
    }

    pub fn from_state_with_policy(
        state: TournamentState,
        policy: Arc<dyn AnchorPolicy>,
    ) -> TournamentResult<Self> {
        if state.version != SNAPSHOT_VERSION {
            return Err(TournamentError::InconsistentState(format!(
                "snapshot version {} is not {}",
                state.version, SNAPSHOT_VERSION
            )));
        }

        let mut tournament = Self::with_anchor_policy(state.config, policy)?;
        for player in state.players {
            if Some(player.total_points()) != player.recomputed_total() {
                return Err(TournamentError::InconsistentState(format!(
                    "total points of {} do not match their history",
                    player.name()
                )));
            }
            tournament.roster.insert(player)?;
        }

        let round = state.phase.round();
        let numbered = state
            .rounds
            .iter()
            .enumerate()
            .all(|(index, r)| r.number as usize == index + 1);
        if state.rounds.len() != round as usize || !numbered {
            return Err(TournamentError::InconsistentState(format!(
                "round {round} does not match {} recorded rounds",
                state.rounds.len()
            )));
        }

        tournament.phase = state.phase;
        tournament.rounds = state.rounds;
        tournament.check_rounds()?;
        Ok(tournament)
    }

    /// Check every recorded round against the roster and the phase it reached
    fn check_rounds(&self) -> TournamentResult<()> {
        let inconsistent = |round: RoundNumber, reason: String| -> TournamentResult<()> {
            Err(TournamentError::InconsistentState(format!("round {round}: {reason}")))
        };
        let current = self.phase.round();
        let odd_roster = self.roster.len() % 2 == 1;

        for round in &self.rounds {
            let number = round.number;
            // Earlier rounds went all the way through results
            let reached = if number < current {
                Results.ordinal()
            } else {
                self.phase.current().ordinal()
            };

            let mut placed = BTreeSet::new();
            let names = round
                .pairings
                .iter()
                .flat_map(|pairing| [pairing.player1.as_str(), pairing.player2.as_str()])
                .chain(round.bye.as_deref());
            for name in names {
                if !self.roster.contains(name) {
                    return inconsistent(number, format!("{name} is not registered"));
                }
                if !placed.insert(name) {
                    return inconsistent(number, format!("{name} is placed twice"));
                }
            }
            if let Some(pairing) = round.pairings.iter().find(|p| p.id.round != number) {
                return inconsistent(number, format!("holds pairing {}", pairing.id));
            }
            if round.bye.is_some() && !odd_roster {
                return inconsistent(number, "bye on an even roster".to_string());
            }
            if reached > Pairings.ordinal() && placed.len() != self.roster.len() {
                return inconsistent(number, "left pairings with unplaced players".to_string());
            }

            if round.tables_assigned() {
                if reached < Assignments.ordinal() {
                    return inconsistent(number, "tables assigned during pairings".to_string());
                }
                if let Some(name) = placed
                    .iter()
                    .find(|name| self.roster.get(name).is_ok_and(|p| p.record(number).is_none()))
                {
                    return inconsistent(number, format!("{name} has no seat record"));
                }
            } else if reached == Results.ordinal() {
                return inconsistent(number, "reached results without tables".to_string());
            }

            let scored = round.pairings.iter().any(Pairing::is_decided)
                || !round.list_scores.is_empty();
            if scored && reached < Results.ordinal() {
                return inconsistent(number, "scored before reaching results".to_string());
            }
            if number < current && !round.pending().is_empty() {
                return inconsistent(number, "finished with results pending".to_string());
            }
        }

        for player in self.roster.iter() {
            for record in player.rounds() {
                let seated = record
                    .round
                    .checked_sub(1)
                    .and_then(|index| self.rounds.get(index as usize))
                    .is_some_and(RoundState::tables_assigned);
                if !seated {
                    return inconsistent(
                        record.round,
                        format!("{} holds a record for an unseated round", player.name()),
                    );
                }
            }
        }
        Ok(())
    }

    /// Snapshot for the persistence collaborator
    pub fn snapshot(&self) -> TournamentState {
        TournamentState {
            version: SNAPSHOT_VERSION,
            config: self.config.clone(),
            phase: self.phase.clone(),
            players: self.roster.iter().cloned().collect(),
            rounds: self.rounds.clone(),
        }
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    /// Current phase
    pub fn current(&self) -> Phase {
        self.phase.current()
    }

    /// Current round, 0 while registration is open
    pub fn round(&self) -> RoundNumber {
        self.phase.round()
    }

    /// Every round started so far, oldest first
    pub fn rounds(&self) -> &[RoundState] {
        &self.rounds
    }

    /// The round in progress
    pub fn current_round(&self) -> Option<&RoundState> {
        self.rounds
            .last()
            .filter(|round| round.number == self.phase.round())
    }

    fn round_state(&self) -> TournamentResult<&RoundState> {
        self.current_round().ok_or_else(|| {
            TournamentError::InconsistentState(format!(
                "no state recorded for round {}",
                self.phase.round()
            ))
        })
    }

    fn round_state_mut(&mut self) -> TournamentResult<&mut RoundState> {
        let number = self.phase.round();
        self.rounds
            .last_mut()
            .filter(|round| round.number == number)
            .ok_or_else(|| {
                TournamentError::InconsistentState(format!("no state recorded for round {number}"))
            })
    }

    /// Take pending phase notifications
    pub fn drain_events(&mut self) -> Vec<PhaseEvent> {
        self.phase.drain_events().into()
    }

    // Roster

    /// Register a player
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside registration, `DuplicateName` if the name is
    /// taken, `InvalidName` for a blank or padded name.
    pub fn add_player(
        &mut self,
        name: &str,
        owned_list: Option<&str>,
        is_anchor: bool,
    ) -> TournamentResult<()> {
        self.require_roster_changes()?;
        let owned_list = owned_list
            .map(str::trim)
            .filter(|list| !list.is_empty())
            .map(str::to_string);
        self.roster.insert(Player::new(name, owned_list, is_anchor))?;
        log::info!("Registered player {name}");
        Ok(())
    }

    pub fn get_player(&self, name: &str) -> TournamentResult<&Player> {
        self.roster.get(name)
    }

    /// Players in registration order; clone the iterator to restart it
    pub fn list_players(&self) -> std::slice::Iter<'_, Player> {
        self.roster.iter()
    }

    /// Players administering `list`, in registration order
    pub fn players_in_list<'a>(
        &'a self,
        list: &'a str,
    ) -> impl Iterator<Item = &'a Player> + Clone {
        self.roster.players_in_list(list)
    }

    /// Remove a player while registration is open
    pub fn remove_player(&mut self, name: &str) -> TournamentResult<Player> {
        self.require_roster_changes()?;
        let player = self.roster.remove(name)?;
        log::info!("Removed player {name}");
        Ok(player)
    }

    fn require_roster_changes(&self) -> TournamentResult<()> {
        let actual = self.phase.current();
        if actual.allows_roster_changes() {
            Ok(())
        } else {
            Err(TournamentError::InvalidPhase {
                expected: Registration.into(),
                actual,
            })
        }
    }

    // Phases

    /// Move to the next phase of the current round
    ///
    /// # Errors
    ///
    /// - `PairingInfeasible` leaving registration with too few players
    /// - `IncompletePairing` leaving pairings while a player is unplaced
    /// - `TablesNotAssigned` leaving assignments before tables are assigned
    /// - `TerminalPhase` in the results phase
    pub fn advance(&mut self) -> TournamentResult<Phase> {
        match self.phase.current() {
            Phase::Registration(_) => {
                if self.roster.len() < self.config.min_players {
                    return Err(TournamentError::PairingInfeasible {
                        needed: self.config.min_players,
                        eligible: self.roster.len(),
                    });
                }
            }
            Phase::Pairings(_) => {
                let unpaired = self.unpaired_players();
                if !unpaired.is_empty() {
                    return Err(TournamentError::IncompletePairing {
                        round: self.phase.round(),
                        unpaired,
                    });
                }
            }
            Phase::Assignments(_) => {
                if !self.round_state()?.tables_assigned() {
                    return Err(TournamentError::TablesNotAssigned(self.phase.round()));
                }
            }
            Phase::Results(_) => {}
        }

        let next = self.phase.advance()?;
        if matches!(next, Phase::Pairings(_)) {
            self.rounds.push(RoundState::new(self.phase.round()));
        }
        Ok(next)
    }

    /// Finish the current round and open pairings for the next one
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside results, `ResultsPending` while a pairing has no
    /// result, `TerminalPhase` once the configured last round is played.
    pub fn next_round(&mut self) -> TournamentResult<RoundNumber> {
        self.phase.require(Results)?;
        let pending = self.round_state()?.pending();
        if !pending.is_empty() {
            return Err(TournamentError::ResultsPending {
                round: self.phase.round(),
                pending,
            });
        }

        let number = self.phase.begin_next_round(self.config.max_rounds)?;
        self.rounds.push(RoundState::new(number));
        Ok(number)
    }

    // Pairing

    /// Who each player met in earlier rounds
    pub fn history(&self) -> PairingHistory {
        let current = self.phase.round();
        PairingHistory::from_pairings(
            self.rounds
                .iter()
                .filter(|round| round.number < current)
                .flat_map(|round| round.pairings.iter()),
        )
    }

    /// Players with neither a pairing nor the bye this round, in
    /// registration order
    pub fn unpaired_players(&self) -> Vec<String> {
        let Some(round) = self.current_round() else {
            return Vec::new();
        };
        self.roster
            .iter()
            .filter(|player| !round.is_placed(player.name()))
            .map(|player| player.name().to_string())
            .collect()
    }

    /// Run the pairing engine, replacing any draft for the round
    pub fn generate_pairings(&mut self) -> TournamentResult<&RoundState> {
        self.phase.require(Pairings)?;
        self.round_state()?;
        let history = self.history();
        let players: Vec<&Player> = self.roster.iter().collect();
        let pairings = self
            .pairing_engine
            .pair_round(self.phase.round(), &players, &history)?;

        let round = self.round_state_mut()?;
        round.apply_pairings(pairings);
        Ok(round)
    }

    /// Add a hand-made pairing to the round's draft
    pub fn pair_players(&mut self, a: &str, b: &str) -> TournamentResult<PairingId> {
        self.phase.require(Pairings)?;
        if a == b {
            return Err(TournamentError::SelfPairing(a.to_string()));
        }
        let (player_a, player_b) = (self.roster.get(a)?, self.roster.get(b)?);
        let round = self.round_state()?;
        for name in [a, b] {
            if round.is_placed(name) {
                return Err(TournamentError::AlreadyPaired(name.to_string()));
            }
        }

        let id = PairingId::new(round.number, round.pairings.len() as u32 + 1);
        let (pairing, warnings) =
            self.pairing_engine
                .build_pairing(id, player_a, player_b, &self.history());
        for warning in &warnings {
            log::warn!("Round {}: {warning}", id.round);
        }

        let round = self.round_state_mut()?;
        round.pairings.push(pairing);
        round.warnings.extend(warnings);
        log::info!("Pairing {id}: {a} vs {b}");
        Ok(id)
    }

    /// Take a player out of the draft: their pairing is dissolved (and the
    /// rest renumbered), or their bye is withdrawn
    pub fn unpair_player(&mut self, name: &str) -> TournamentResult<Option<Pairing>> {
        self.phase.require(Pairings)?;
        self.roster.get(name)?;
        let round = self.round_state_mut()?;

        if round.bye.as_deref() == Some(name) {
            round.bye = None;
            return Ok(None);
        }

        let index = round
            .pairings
            .iter()
            .position(|pairing| pairing.involves(name))
            .ok_or_else(|| TournamentError::NotPaired(name.to_string()))?;
        let removed = round.pairings.remove(index);
        round
            .warnings
            .retain(|warning| !(warning.involves(&removed.player1) && warning.involves(&removed.player2)));
        round.renumber();
        log::info!("Dissolved pairing {} vs {}", removed.player1, removed.player2);
        Ok(Some(removed))
    }

    /// Give a player the round's bye (odd rosters only)
    pub fn set_bye(&mut self, name: &str) -> TournamentResult<()> {
        self.phase.require(Pairings)?;
        self.roster.get(name)?;
        if self.roster.len() % 2 == 0 {
            return Err(TournamentError::ByeNotAllowed(name.to_string()));
        }
        let round = self.round_state_mut()?;
        if round.pairing_of(name).is_some() {
            return Err(TournamentError::AlreadyPaired(name.to_string()));
        }
        round.bye = Some(name.to_string());
        Ok(())
    }

    // Assignment

    /// Seat the round's pairings and record each player's table and list
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside assignments, `TablesAlreadyAssigned` on a
    /// second call in the same round.
    pub fn assign_tables(&mut self) -> TournamentResult<&[TableAssignment]> {
        self.phase.require(Assignments)?;
        let round = self.round_state()?;
        if round.tables_assigned() {
            return Err(TournamentError::TablesAlreadyAssigned(round.number));
        }

        let assignments = self
            .assignment_engine
            .assign(&round.pairings, round.bye.as_deref());
        let records = self.assignment_engine.round_records(
            round.number,
            &round.pairings,
            &assignments,
            &self.roster,
        )?;

        for (name, record) in records {
            self.roster.get_mut(&name)?.push_record(record);
        }
        log::info!(
            "Round {}: assigned {} tables",
            self.phase.round(),
            self.assignment_engine.table_count(self.roster.len())
        );

        let round = self.round_state_mut()?;
        round.assignments = assignments;
        Ok(&round.assignments)
    }

    // Scoring

    /// Record the scores of a pairing and refresh totals
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside results, `PairingNotFound` for a pairing not in
    /// the current round, `AlreadySubmitted` for a decided pairing and
    /// `InvalidScore` for scores the configuration rejects.
    pub fn submit_result(
        &mut self,
        id: PairingId,
        player1_score: Points,
        player2_score: Points,
    ) -> TournamentResult<()> {
        self.phase.require(Results)?;
        let round = self.round_state()?;
        let pairing = round
            .pairing(id)
            .ok_or(TournamentError::PairingNotFound(id))?;
        if pairing.is_decided() {
            return Err(TournamentError::ResultAlreadySubmitted(id));
        }
        let result = self
            .scoring_engine
            .validate_result(player1_score, player2_score)?;

        let number = round.number;
        let scores = [
            (pairing.player1.clone(), player1_score),
            (pairing.player2.clone(), player2_score),
        ];
        let mut updates = Vec::with_capacity(scores.len());
        for (name, score) in &scores {
            let mut record = self.seated_record(name, number)?;
            record.player_points = Some(*score);
            updates.push((name.as_str(), record));
        }
        let totals = self.checked_totals(&updates)?;

        self.apply_scores(updates, totals)?;
        if let Some(pairing) = self.round_state_mut()?.pairing_mut(id) {
            pairing.result = Some(result);
        }

        log::info!(
            "Result {id}: {} {player1_score} - {player2_score} {}",
            scores[0].0,
            scores[1].0
        );
        Ok(())
    }

    /// Credit list points to every player owning the list or assigned it
    /// this round. Returns the credited players.
    pub fn submit_list_score(&mut self, list: &str, points: Points) -> TournamentResult<Vec<String>> {
        self.phase.require(Results)?;
        let points = self.scoring_engine.validate_list_points(points)?;
        let round = self.round_state()?;
        let number = round.number;
        if round.list_scores.contains_key(list) {
            return Err(TournamentError::ListScoreAlreadySubmitted {
                list: list.to_string(),
                round: number,
            });
        }

        let credited: Vec<String> = self
            .roster
            .iter()
            .filter(|player| {
                player.owns_list(list)
                    || player
                        .record(number)
                        .and_then(|record| record.assigned_list.as_deref())
                        == Some(list)
            })
            .map(|player| player.name().to_string())
            .collect();
        if credited.is_empty() {
            return Err(TournamentError::ListNotFound(list.to_string()));
        }
        let mut updates = Vec::with_capacity(credited.len());
        for name in &credited {
            let mut record = self.seated_record(name, number)?;
            let list_points = record
                .list_points
                .unwrap_or(0)
                .checked_add(points)
                .ok_or_else(|| {
                    TournamentError::InvalidScore(format!("list points of {name} would overflow"))
                })?;
            record.list_points = Some(list_points);
            updates.push((name.as_str(), record));
        }
        let totals = self.checked_totals(&updates)?;

        self.apply_scores(updates, totals)?;
        self.round_state_mut()?
            .list_scores
            .insert(list.to_string(), points);

        log::info!("List {list} scored {points} in round {number}");
        Ok(credited)
    }

    /// Reset every total to the sum of the player's history; idempotent
    pub fn recompute_totals(&mut self) -> TournamentResult<()> {
        self.scoring_engine.recompute_totals(&mut self.roster)
    }

    /// Copy of the player's record for a round they were seated in
    fn seated_record(&self, name: &str, round: RoundNumber) -> TournamentResult<RoundRecord> {
        self.roster
            .get(name)?
            .record(round)
            .cloned()
            .ok_or(TournamentError::TablesNotAssigned(round))
    }

    /// Totals each player would reach with their updated record
    fn checked_totals(&self, updates: &[(&str, RoundRecord)]) -> TournamentResult<Vec<Points>> {
        updates
            .iter()
            .map(|(name, record)| {
                self.scoring_engine
                    .checked_total(self.roster.get(name)?, record)
            })
            .collect()
    }

    /// Write already checked records and their totals
    fn apply_scores(
        &mut self,
        updates: Vec<(&str, RoundRecord)>,
        totals: Vec<Points>,
    ) -> TournamentResult<()> {
        for ((name, record), total) in updates.into_iter().zip(totals) {
            let player = self.roster.get_mut(name)?;
            player.replace_record(record);
            player.set_total_points(total);
        }
        Ok(())
    }

    /// Players by total points descending, then name
    pub fn standings(&self) -> Standings<'_> {
        self.scoring_engine.standings(&self.roster)
    }
}
