use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle of a round. `Resolving` means two cards are face-up and a
/// mismatch is waiting for its reveal-cancel; input is ignored until then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Active,
    Resolving,
    Won,
}

/// UI-shell input, decoupled from whatever event source produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartRound { player_name: String },
    SelectCard { position: usize },
    ResetRound,
    RequestHint,
}

/// Point-in-time view of the board; the display sink renders exclusively
/// from these, never from live engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub phase: Phase,
    pub cards: Vec<CardSnapshot>,
    pub moves: u32,
    pub elapsed: Duration,
}

impl BoardSnapshot {
    pub fn face_up_count(&self) -> usize {
        self.cards.iter().filter(|c| c.face_up).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSnapshot {
    pub face: char,
    pub face_up: bool,
    pub matched: bool,
}

/// Outcome of a completed round, serialized with the score store's column
/// names (`attempts` is the store's name for the move counter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub player_name: String,
    #[serde(rename = "attempts")]
    pub moves: u32,
    pub matches: u32,
    pub elapsed_seconds: u64,
}

/// A leaderboard record as returned by the score store. Older rows used
/// `moves` and `created_at`; the accessors paper over both generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    #[serde(default)]
    pub attempts: Option<u32>,
    #[serde(default)]
    pub moves: Option<u32>,
    #[serde(default)]
    pub matches: Option<u32>,
    #[serde(default)]
    pub elapsed_seconds: Option<u64>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ScoreEntry {
    pub fn move_count(&self) -> Option<u32> {
        self.attempts.or(self.moves)
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at.or(self.created_at)
    }
}

/// Game state as sent to the hint oracle. Field names match the oracle's
/// wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintContext {
    pub deck: Vec<char>,
    pub matched_indices: Vec<usize>,
    pub flipped_indices: Vec<usize>,
    pub moves: u32,
}

/// What the view should show in the leaderboard panel. `Disabled` (store
/// unconfigured) and `Empty` (no rows yet) are distinct from `Failed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeaderboardView<'a> {
    Disabled,
    Empty,
    Entries(&'a [ScoreEntry]),
    Failed,
}
