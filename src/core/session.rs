//! Game session: command dispatch and async orchestration.
//!
//! Owns the engine behind a mutex and wires in everything the state machine
//! deliberately does not do itself: the mismatch reveal delay, the clock
//! ticker, fire-and-forget score submission, and single-flight hint
//! requests. Network failures surface as view notices and log lines only;
//! they never touch game state.

use crate::adapters::hint::HintClient;
use crate::adapters::score_store::ScoreStoreClient;
use crate::config::AppConfig;
use crate::core::clock::Ticker;
use crate::core::deck::{Deck, CARD_FACES};
use crate::core::engine::{MatchEngine, ResolveToken, SelectOutcome};
use crate::domain::model::{Command, LeaderboardView, ScoreSummary};
use crate::domain::ports::{GameView, HintOracle, ScoreReporter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const SCORE_SUBMIT_FAILED_NOTICE: &str = "Could not save your score. The round still counts!";
const HINT_FAILED_NOTICE: &str = "Could not fetch a hint right now. Try again in a moment.";

pub struct GameSession {
    engine: Arc<Mutex<MatchEngine>>,
    view: Arc<dyn GameView>,
    scores: Option<Arc<dyn ScoreReporter>>,
    oracle: Option<Arc<dyn HintOracle>>,
    mismatch_delay: Duration,
    leaderboard_limit: usize,
    ticker: Mutex<Option<Ticker>>,
    hint_pending: Arc<AtomicBool>,
}

impl GameSession {
    pub fn new(view: Arc<dyn GameView>, mismatch_delay: Duration, leaderboard_limit: usize) -> Self {
        Self {
            engine: Arc::new(Mutex::new(MatchEngine::new())),
            view,
            scores: None,
            oracle: None,
            mismatch_delay,
            leaderboard_limit,
            ticker: Mutex::new(None),
            hint_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wire up the optional collaborators from configuration: absent
    /// settings leave the corresponding feature disabled.
    pub fn from_config(config: &AppConfig, view: Arc<dyn GameView>) -> Self {
        let mut session = Self::new(
            view,
            Duration::from_millis(config.mismatch_delay_ms),
            config.leaderboard_limit,
        );
        if let Some((base_url, api_key)) = config.score_store() {
            session = session.with_score_reporter(Arc::new(ScoreStoreClient::new(base_url, api_key)));
        } else {
            tracing::info!("score store not configured, leaderboard disabled");
        }
        if let Some(endpoint) = config.hint_endpoint() {
            session = session.with_hint_oracle(Arc::new(HintClient::new(endpoint)));
        } else {
            tracing::info!("hint endpoint not configured, hints disabled");
        }
        session
    }

    pub fn with_score_reporter(mut self, scores: Arc<dyn ScoreReporter>) -> Self {
        self.scores = Some(scores);
        self
    }

    pub fn with_hint_oracle(mut self, oracle: Arc<dyn HintOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn leaderboard_enabled(&self) -> bool {
        self.scores.is_some()
    }

    pub fn hints_enabled(&self) -> bool {
        self.oracle.is_some()
    }

    /// Whether a hint request is outstanding; shells disable the hint
    /// trigger while this is true.
    pub fn hint_in_flight(&self) -> bool {
        self.hint_pending.load(Ordering::SeqCst)
    }

    pub async fn dispatch(&self, command: Command) {
        match command {
            Command::StartRound { player_name } => self.start_round(&player_name).await,
            Command::SelectCard { position } => self.select_card(position).await,
            Command::ResetRound => self.reset_round().await,
            Command::RequestHint => self.request_hint().await,
        }
    }

    async fn start_round(&self, player_name: &str) {
        let deck = Deck::generate(&CARD_FACES, &mut rand::thread_rng());
        let mut engine = self.engine.lock().await;
        match engine.start_round(player_name, deck) {
            Ok(()) => {
                self.view.render(&engine.snapshot());
                let clock = engine.clock();
                drop(engine);

                if let Some(clock) = clock {
                    *self.ticker.lock().await = Some(Ticker::spawn(clock, Arc::clone(&self.view)));
                }
                tracing::info!(player = player_name.trim(), "round started");
            }
            Err(err) => {
                tracing::warn!(%err, "round start rejected");
                self.view.notice(&err.to_string());
            }
        }
    }

    async fn select_card(&self, position: usize) {
        let mut engine = self.engine.lock().await;
        match engine.select_card(position) {
            SelectOutcome::Ignored => {}
            SelectOutcome::Flipped { .. } => {
                self.view.render(&engine.snapshot());
            }
            SelectOutcome::Matched { won: false, .. } => {
                self.view.render(&engine.snapshot());
            }
            SelectOutcome::Matched { won: true, .. } => {
                self.view.render(&engine.snapshot());
                let summary = engine.summary();
                drop(engine);

                self.ticker.lock().await.take();
                if let Some(summary) = summary {
                    tracing::info!(
                        player = %summary.player_name,
                        moves = summary.moves,
                        elapsed_seconds = summary.elapsed_seconds,
                        "round won"
                    );
                    self.view.round_won(&summary);
                    self.submit_score(summary);
                }
            }
            SelectOutcome::Mismatched { token, .. } => {
                self.view.render(&engine.snapshot());
                drop(engine);
                self.schedule_reveal_cancel(token);
            }
        }
    }

    async fn reset_round(&self) {
        self.ticker.lock().await.take();
        let mut engine = self.engine.lock().await;
        engine.reset_round();
        self.view.render(&engine.snapshot());
        tracing::info!("round reset");
    }

    /// Un-reveal a mismatched pair after the configured delay. The token
    /// carries the round generation, so a reset in the meantime turns the
    /// callback into a no-op.
    fn schedule_reveal_cancel(&self, token: ResolveToken) {
        let engine = Arc::clone(&self.engine);
        let view = Arc::clone(&self.view);
        let delay = self.mismatch_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut engine = engine.lock().await;
            if engine.resolve_mismatch(token) {
                view.render(&engine.snapshot());
            } else {
                tracing::debug!("stale mismatch resolution dropped");
            }
        });
    }

    /// Fire-and-forget: failure is a notice, never a state change. On
    /// success the leaderboard refreshes with the new entry.
    fn submit_score(&self, summary: ScoreSummary) {
        let Some(scores) = self.scores.clone() else {
            tracing::debug!("score store not configured, skipping submission");
            return;
        };
        let view = Arc::clone(&self.view);
        let limit = self.leaderboard_limit;
        tokio::spawn(async move {
            match scores.submit(&summary).await {
                Ok(()) => {
                    tracing::info!(player = %summary.player_name, "score submitted");
                    refresh(scores.as_ref(), view.as_ref(), limit).await;
                }
                Err(err) => {
                    tracing::warn!(%err, "score submission failed");
                    view.notice(SCORE_SUBMIT_FAILED_NOTICE);
                }
            }
        });
    }

    pub async fn refresh_leaderboard(&self) {
        match &self.scores {
            Some(scores) => {
                refresh(scores.as_ref(), self.view.as_ref(), self.leaderboard_limit).await
            }
            None => self.view.leaderboard(LeaderboardView::Disabled),
        }
    }

    async fn request_hint(&self) {
        let Some(oracle) = self.oracle.clone() else {
            tracing::debug!("hint oracle not configured, ignoring request");
            return;
        };
        if self
            .hint_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("hint request already in flight");
            return;
        }

        let (context, generation) = {
            let engine = self.engine.lock().await;
            (engine.hint_context(), engine.generation())
        };
        let Some(context) = context else {
            self.hint_pending.store(false, Ordering::SeqCst);
            return;
        };

        let engine = Arc::clone(&self.engine);
        let view = Arc::clone(&self.view);
        let pending = Arc::clone(&self.hint_pending);
        tokio::spawn(async move {
            let result = oracle.request_hint(&context).await;
            let current_generation = engine.lock().await.generation();
            if current_generation == generation {
                match result {
                    Ok(hint) => view.show_hint(&hint),
                    Err(err) => {
                        tracing::warn!(%err, "hint request failed");
                        view.notice(HINT_FAILED_NOTICE);
                    }
                }
            } else {
                tracing::debug!("stale hint response dropped");
            }
            pending.store(false, Ordering::SeqCst);
        });
    }
}

async fn refresh(scores: &dyn ScoreReporter, view: &dyn GameView, limit: usize) {
    match scores.fetch_recent(limit).await {
        Ok(entries) if entries.is_empty() => view.leaderboard(LeaderboardView::Empty),
        Ok(entries) => view.leaderboard(LeaderboardView::Entries(&entries)),
        Err(err) => {
            tracing::warn!(%err, "leaderboard fetch failed");
            view.leaderboard(LeaderboardView::Failed);
        }
    }
}
