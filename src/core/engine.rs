//! Match engine: the state machine that owns all round state.
//!
//! The engine is synchronous and I/O-free. The two asynchronous suspensions
//! of the game (the mismatch reveal-cancel delay and in-flight hint
//! requests) are externalized: a mismatch hands back a generation-stamped
//! [`ResolveToken`], and any caller holding state across an await compares
//! [`MatchEngine::generation`] afterwards. Resetting or restarting a round
//! bumps the generation, so stale callbacks detect the mismatch and no-op.

use crate::core::clock::{elapsed_seconds, RoundClock};
use crate::core::deck::Deck;
use crate::domain::model::{BoardSnapshot, CardSnapshot, HintContext, Phase, ScoreSummary};
use crate::utils::error::{GameError, Result};
use std::collections::BTreeSet;
use std::time::Duration;

/// Proof that a mismatch is pending for a specific round. Redeemable once
/// via [`MatchEngine::resolve_mismatch`]; worthless after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveToken {
    generation: u64,
}

/// What a single card selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Not in `Active`, out of range, already matched, or already selected.
    Ignored,
    /// First card of a pair turned face-up.
    Flipped { position: usize },
    /// Second card completed a matching pair.
    Matched { positions: (usize, usize), won: bool },
    /// Second card completed a non-matching pair; the caller schedules
    /// `resolve_mismatch(token)` after the reveal delay.
    Mismatched {
        positions: (usize, usize),
        token: ResolveToken,
    },
}

pub struct MatchEngine {
    deck: Deck,
    phase: Phase,
    selected: Vec<usize>,
    matched: BTreeSet<usize>,
    moves: u32,
    player_name: String,
    generation: u64,
    clock: Option<RoundClock>,
    final_elapsed: Option<Duration>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            deck: Deck::empty(),
            phase: Phase::Idle,
            selected: Vec::new(),
            matched: BTreeSet::new(),
            moves: 0,
            player_name: String::new(),
            generation: 0,
            clock: None,
            final_elapsed: None,
        }
    }

    /// Begin a fresh round. Valid from any phase; fails without mutating
    /// state when the player name is blank or the deck is empty.
    pub fn start_round(&mut self, player_name: &str, deck: Deck) -> Result<()> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(GameError::ValidationError {
                message: "player name must not be empty".to_string(),
            });
        }
        if deck.is_empty() {
            return Err(GameError::ValidationError {
                message: "deck must contain at least one pair".to_string(),
            });
        }

        self.generation += 1;
        self.deck = deck;
        self.selected.clear();
        self.matched.clear();
        self.moves = 0;
        self.player_name = player_name.to_string();
        self.clock = Some(RoundClock::start());
        self.final_elapsed = None;
        self.phase = Phase::Active;
        Ok(())
    }

    /// Turn the card at `position` face-up. Invalid selections are silent
    /// no-ops, never errors: while `Resolving`, on matched slots, on the
    /// already-selected slot, and out of range.
    pub fn select_card(&mut self, position: usize) -> SelectOutcome {
        if self.phase != Phase::Active {
            return SelectOutcome::Ignored;
        }
        if position >= self.deck.len()
            || self.matched.contains(&position)
            || self.selected.contains(&position)
        {
            return SelectOutcome::Ignored;
        }

        self.selected.push(position);
        if self.selected.len() < 2 {
            return SelectOutcome::Flipped { position };
        }

        // Pair complete: one move regardless of outcome.
        self.moves += 1;
        let (first, second) = (self.selected[0], self.selected[1]);

        if self.deck.face(first) == self.deck.face(second) {
            self.matched.insert(first);
            self.matched.insert(second);
            self.selected.clear();

            let won = self.matched.len() == self.deck.len();
            if won {
                self.final_elapsed = Some(self.elapsed());
                self.clock = None;
                self.phase = Phase::Won;
            }
            SelectOutcome::Matched {
                positions: (first, second),
                won,
            }
        } else {
            self.phase = Phase::Resolving;
            SelectOutcome::Mismatched {
                positions: (first, second),
                token: ResolveToken {
                    generation: self.generation,
                },
            }
        }
    }

    /// Cancel the reveal of a mismatched pair. Returns `false` (and leaves
    /// state untouched) when the token is stale or nothing is pending.
    pub fn resolve_mismatch(&mut self, token: ResolveToken) -> bool {
        if self.phase != Phase::Resolving || token.generation != self.generation {
            return false;
        }
        self.selected.clear();
        self.phase = Phase::Active;
        true
    }

    /// Discard all round state. Valid from any phase.
    pub fn reset_round(&mut self) {
        self.generation += 1;
        self.deck = Deck::empty();
        self.selected.clear();
        self.matched.clear();
        self.moves = 0;
        self.player_name.clear();
        self.clock = None;
        self.final_elapsed = None;
        self.phase = Phase::Idle;
    }

    /// The completed round's summary; `None` unless the round is won.
    pub fn summary(&self) -> Option<ScoreSummary> {
        if self.phase != Phase::Won {
            return None;
        }
        Some(ScoreSummary {
            player_name: self.player_name.clone(),
            moves: self.moves,
            matches: self.matched.len() as u32,
            elapsed_seconds: elapsed_seconds(self.elapsed()),
        })
    }

    /// State serialized for the hint oracle; `None` outside a round.
    pub fn hint_context(&self) -> Option<HintContext> {
        match self.phase {
            Phase::Active | Phase::Resolving => Some(HintContext {
                deck: self.deck.faces().to_vec(),
                matched_indices: self.matched.iter().copied().collect(),
                flipped_indices: self.selected.clone(),
                moves: self.moves,
            }),
            Phase::Idle | Phase::Won => None,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let cards = self
            .deck
            .faces()
            .iter()
            .enumerate()
            .map(|(position, &face)| CardSnapshot {
                face,
                face_up: self.matched.contains(&position) || self.selected.contains(&position),
                matched: self.matched.contains(&position),
            })
            .collect();

        BoardSnapshot {
            phase: self.phase,
            cards,
            moves: self.moves,
            elapsed: self.elapsed(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        if let Some(frozen) = self.final_elapsed {
            return frozen;
        }
        self.clock.map(|clock| clock.elapsed()).unwrap_or_default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> Option<RoundClock> {
        self.clock
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pair_deck() -> Deck {
        Deck::from_faces(vec!['🍎', '🍊', '🍎', '🍊']).unwrap()
    }

    fn active_engine() -> MatchEngine {
        let mut engine = MatchEngine::new();
        engine.start_round("Mina", two_pair_deck()).unwrap();
        engine
    }

    #[test]
    fn start_round_with_blank_name_fails_without_mutation() {
        let mut engine = MatchEngine::new();
        let err = engine.start_round("   ", two_pair_deck()).unwrap_err();
        assert!(matches!(err, GameError::ValidationError { .. }));
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn start_round_trims_player_name() {
        let mut engine = MatchEngine::new();
        engine.start_round("  Mina  ", two_pair_deck()).unwrap();
        assert_eq!(engine.player_name(), "Mina");
    }

    #[test]
    fn selecting_in_idle_is_ignored() {
        let mut engine = MatchEngine::new();
        assert_eq!(engine.select_card(0), SelectOutcome::Ignored);
    }

    #[test]
    fn selecting_same_position_twice_adds_it_once() {
        let mut engine = active_engine();
        assert_eq!(engine.select_card(0), SelectOutcome::Flipped { position: 0 });
        assert_eq!(engine.select_card(0), SelectOutcome::Ignored);
        assert_eq!(engine.snapshot().face_up_count(), 1);
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut engine = active_engine();
        assert_eq!(engine.select_card(99), SelectOutcome::Ignored);
    }

    #[test]
    fn matching_pairs_through_to_win() {
        let mut engine = active_engine();

        engine.select_card(0);
        let outcome = engine.select_card(2);
        assert_eq!(
            outcome,
            SelectOutcome::Matched {
                positions: (0, 2),
                won: false
            }
        );
        assert_eq!(engine.matched_count(), 2);
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.phase(), Phase::Active);
        assert!(engine.summary().is_none());

        engine.select_card(1);
        let outcome = engine.select_card(3);
        assert_eq!(
            outcome,
            SelectOutcome::Matched {
                positions: (1, 3),
                won: true
            }
        );
        assert_eq!(engine.matched_count(), 4);
        assert_eq!(engine.moves(), 2);
        assert_eq!(engine.phase(), Phase::Won);

        let summary = engine.summary().unwrap();
        assert_eq!(summary.player_name, "Mina");
        assert_eq!(summary.moves, 2);
        assert_eq!(summary.matches, 4);
    }

    #[test]
    fn matched_count_stays_even_after_every_match() {
        let mut engine = active_engine();
        engine.select_card(0);
        engine.select_card(2);
        assert_eq!(engine.matched_count() % 2, 0);
        engine.select_card(1);
        engine.select_card(3);
        assert_eq!(engine.matched_count() % 2, 0);
    }

    #[test]
    fn matched_positions_are_not_selectable_again() {
        let mut engine = active_engine();
        engine.select_card(0);
        engine.select_card(2);
        assert_eq!(engine.select_card(0), SelectOutcome::Ignored);
        assert_eq!(engine.select_card(2), SelectOutcome::Ignored);
    }

    #[test]
    fn mismatch_counts_a_move_and_blocks_input_until_resolved() {
        let mut engine = active_engine();
        engine.select_card(0);
        let outcome = engine.select_card(1);

        let token = match outcome {
            SelectOutcome::Mismatched {
                positions: (0, 1),
                token,
            } => token,
            other => panic!("expected mismatch, got {:?}", other),
        };
        assert_eq!(engine.phase(), Phase::Resolving);
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.snapshot().face_up_count(), 2);

        // Input ignored while the reveal-cancel is pending.
        assert_eq!(engine.select_card(2), SelectOutcome::Ignored);
        assert_eq!(engine.select_card(3), SelectOutcome::Ignored);

        assert!(engine.resolve_mismatch(token));
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.snapshot().face_up_count(), 0);
        assert_eq!(engine.matched_count(), 0);
        assert_eq!(engine.moves(), 1);
    }

    #[test]
    fn resolve_without_pending_mismatch_is_a_no_op() {
        let mut engine = active_engine();
        engine.select_card(0);
        let token = match engine.select_card(1) {
            SelectOutcome::Mismatched { token, .. } => token,
            other => panic!("expected mismatch, got {:?}", other),
        };
        assert!(engine.resolve_mismatch(token));
        // Second redemption of the same token does nothing.
        assert!(!engine.resolve_mismatch(token));
        assert_eq!(engine.phase(), Phase::Active);
    }

    #[test]
    fn stale_token_after_reset_leaves_new_round_untouched() {
        let mut engine = active_engine();
        engine.select_card(0);
        let token = match engine.select_card(1) {
            SelectOutcome::Mismatched { token, .. } => token,
            other => panic!("expected mismatch, got {:?}", other),
        };

        engine.reset_round();
        engine.start_round("Mina", two_pair_deck()).unwrap();
        engine.select_card(0);
        engine.select_card(2);

        assert!(!engine.resolve_mismatch(token));
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.matched_count(), 2);
        assert_eq!(engine.moves(), 1);
    }

    #[test]
    fn move_counter_increments_once_per_pair_for_both_outcomes() {
        let mut engine = active_engine();
        engine.select_card(0);
        let token = match engine.select_card(1) {
            SelectOutcome::Mismatched { token, .. } => token,
            other => panic!("expected mismatch, got {:?}", other),
        };
        assert_eq!(engine.moves(), 1);
        engine.resolve_mismatch(token);

        engine.select_card(0);
        engine.select_card(2);
        assert_eq!(engine.moves(), 2);
    }

    #[test]
    fn reset_round_clears_everything() {
        let mut engine = active_engine();
        engine.select_card(0);
        engine.select_card(2);
        let generation = engine.generation();

        engine.reset_round();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.matched_count(), 0);
        assert_eq!(engine.player_name(), "");
        assert!(engine.snapshot().cards.is_empty());
        assert_eq!(engine.generation(), generation + 1);
    }

    #[test]
    fn hint_context_reflects_round_state() {
        let mut engine = active_engine();
        assert!(engine.hint_context().is_some());

        engine.select_card(0);
        engine.select_card(2);
        engine.select_card(1);

        let context = engine.hint_context().unwrap();
        assert_eq!(context.deck, vec!['🍎', '🍊', '🍎', '🍊']);
        assert_eq!(context.matched_indices, vec![0, 2]);
        assert_eq!(context.flipped_indices, vec![1]);
        assert_eq!(context.moves, 1);
    }

    #[test]
    fn hint_context_is_none_outside_a_round() {
        let mut engine = MatchEngine::new();
        assert!(engine.hint_context().is_none());

        engine.start_round("Mina", two_pair_deck()).unwrap();
        engine.select_card(0);
        engine.select_card(2);
        engine.select_card(1);
        engine.select_card(3);
        assert_eq!(engine.phase(), Phase::Won);
        assert!(engine.hint_context().is_none());
    }

    #[test]
    fn snapshot_marks_matched_and_selected_cards() {
        let mut engine = active_engine();
        engine.select_card(0);
        engine.select_card(2);
        engine.select_card(1);

        let snapshot = engine.snapshot();
        assert!(snapshot.cards[0].matched && snapshot.cards[0].face_up);
        assert!(snapshot.cards[2].matched && snapshot.cards[2].face_up);
        assert!(!snapshot.cards[1].matched && snapshot.cards[1].face_up);
        assert!(!snapshot.cards[3].matched && !snapshot.cards[3].face_up);
    }

    #[test]
    fn won_round_freezes_elapsed_time() {
        let mut engine = active_engine();
        engine.select_card(0);
        engine.select_card(2);
        engine.select_card(1);
        engine.select_card(3);

        let first = engine.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(engine.elapsed(), first);
    }
}
