use crate::domain::model::{BoardSnapshot, HintContext, LeaderboardView, ScoreEntry, ScoreSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Display sink. The DOM (or any other frontend) lives behind this trait;
/// control enablement is derived from the snapshot phase by the implementor.
pub trait GameView: Send + Sync {
    fn render(&self, snapshot: &BoardSnapshot);
    fn tick(&self, elapsed: Duration);
    fn notice(&self, message: &str);
    fn round_won(&self, summary: &ScoreSummary);
    fn show_hint(&self, hint: &str);
    fn leaderboard(&self, view: LeaderboardView<'_>);
}

#[async_trait]
pub trait ScoreReporter: Send + Sync {
    async fn submit(&self, summary: &ScoreSummary) -> Result<()>;
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ScoreEntry>>;
}

#[async_trait]
pub trait HintOracle: Send + Sync {
    async fn request_hint(&self, state: &HintContext) -> Result<String>;
}
