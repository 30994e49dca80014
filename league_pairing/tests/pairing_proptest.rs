/// Property-based tests for the pairing engine using proptest
///
/// These tests play random leagues for a few rounds and check that every
/// round's pairings cover the roster exactly once.
use league_pairing::{LeagueConfig, PairingId, Tournament};
use proptest::prelude::*;
use std::collections::BTreeMap;

// Strategy to generate a roster: anchor flags and optional list owners
fn roster_strategy() -> impl Strategy<Value = Vec<(bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 2..=14)
}

// Strategy to generate one score pair per possible pairing
fn scores_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..=20, 0i64..=20), 7)
}

fn league(roster: &[(bool, bool)]) -> Tournament {
    let mut tournament = Tournament::new(LeagueConfig::default()).unwrap();
    for (i, (anchor, owns_list)) in roster.iter().enumerate() {
        let list = owns_list.then(|| format!("List{i}"));
        tournament
            .add_player(&format!("Player{i:02}"), list.as_deref(), *anchor)
            .unwrap();
    }
    tournament
}

proptest! {
    #[test]
    fn test_every_player_placed_once(
        roster in roster_strategy(),
        rounds in prop::collection::vec(scores_strategy(), 1..=4),
    ) {
        let mut tournament = league(&roster);
        tournament.advance().unwrap();

        for (index, scores) in rounds.iter().enumerate() {
            let round = tournament.generate_pairings().unwrap().clone();

            let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
            for pairing in &round.pairings {
                prop_assert_ne!(&pairing.player1, &pairing.player2);
                *seen.entry(pairing.player1.as_str()).or_default() += 1;
                *seen.entry(pairing.player2.as_str()).or_default() += 1;
            }
            if let Some(bye) = &round.bye {
                *seen.entry(bye.as_str()).or_default() += 1;
            }

            prop_assert_eq!(seen.len(), roster.len());
            prop_assert!(seen.values().all(|&count| count == 1));
            prop_assert_eq!(round.bye.is_some(), roster.len() % 2 == 1);
            prop_assert_eq!(round.pairings.len(), roster.len() / 2);

            for (number, pairing) in round.pairings.iter().enumerate() {
                prop_assert_eq!(pairing.id, PairingId::new(round.number, number as u32 + 1));
            }

            tournament.advance().unwrap();
            tournament.assign_tables().unwrap();
            tournament.advance().unwrap();
            for (pairing, (s1, s2)) in round.pairings.iter().zip(scores) {
                tournament.submit_result(pairing.id, *s1, *s2).unwrap();
            }
            if index + 1 < rounds.len() {
                tournament.next_round().unwrap();
            }
        }
    }

    #[test]
    fn test_tables_within_bounds(roster in roster_strategy(), per_table in 1u32..=4) {
        let config = LeagueConfig {
            players_per_table: per_table * 2,
            ..LeagueConfig::default()
        };
        let mut tournament = Tournament::new(config).unwrap();
        for i in 0..roster.len() {
            tournament.add_player(&format!("Player{i:02}"), None, false).unwrap();
        }
        tournament.advance().unwrap();
        tournament.generate_pairings().unwrap();
        tournament.advance().unwrap();

        let max_table = (roster.len() as u32).div_ceil(per_table * 2);
        let assignments = tournament.assign_tables().unwrap();
        prop_assert!(assignments.iter().all(|a| a.table >= 1 && a.table <= max_table));
        prop_assert_eq!(assignments.last().map(|a| a.table), Some(max_table));
    }

    #[test]
    fn test_recompute_is_idempotent(roster in roster_strategy(), scores in scores_strategy()) {
        let mut tournament = league(&roster);
        tournament.advance().unwrap();
        let pairings = tournament.generate_pairings().unwrap().pairings.clone();
        tournament.advance().unwrap();
        tournament.assign_tables().unwrap();
        tournament.advance().unwrap();
        for (pairing, (s1, s2)) in pairings.iter().zip(&scores) {
            tournament.submit_result(pairing.id, *s1, *s2).unwrap();
        }

        let first = tournament.snapshot();
        tournament.recompute_totals().unwrap();
        prop_assert_eq!(tournament.snapshot(), first);
    }
}
