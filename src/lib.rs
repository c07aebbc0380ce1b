pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{hint::HintClient, score_store::ScoreStoreClient};
pub use crate::config::AppConfig;
pub use crate::core::clock::{format_elapsed, RoundClock};
pub use crate::core::deck::{Deck, CARD_FACES};
pub use crate::core::engine::{MatchEngine, SelectOutcome};
pub use crate::core::session::GameSession;
pub use crate::domain::model::{
    BoardSnapshot, CardSnapshot, Command, HintContext, LeaderboardView, Phase, ScoreEntry,
    ScoreSummary,
};
pub use crate::domain::ports::{GameView, HintOracle, ScoreReporter};
pub use crate::utils::error::{GameError, Result};
