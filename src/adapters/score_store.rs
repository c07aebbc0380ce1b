use crate::domain::model::{ScoreEntry, ScoreSummary};
use crate::domain::ports::ScoreReporter;
use crate::utils::error::{GameError, Result};
use async_trait::async_trait;
use reqwest::Client;

const SCORES_TABLE: &str = "card_flip_scores";

/// Supabase-style REST client for the leaderboard store. The key is the
/// store's anon/proxy credential, injected via configuration.
pub struct ScoreStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ScoreStoreClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, SCORES_TABLE)
    }
}

#[async_trait]
impl ScoreReporter for ScoreStoreClient {
    async fn submit(&self, summary: &ScoreSummary) -> Result<()> {
        tracing::debug!(player = %summary.player_name, "submitting score");
        let response = self
            .client
            .post(self.table_url())
            .header("Content-Type", "application/json")
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(summary)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GameError::ScoreStoreError {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ScoreEntry>> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.table_url())
            .query(&[
                ("select", "*"),
                ("order", "completed_at.desc"),
                ("limit", limit.as_str()),
            ])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GameError::ScoreStoreError {
                status: response.status().as_u16(),
            });
        }

        let entries = response.json::<Vec<ScoreEntry>>().await?;
        tracing::debug!(count = entries.len(), "fetched recent scores");
        Ok(entries)
    }
}
