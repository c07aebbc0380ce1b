use crate::domain::model::HintContext;
use crate::domain::ports::HintOracle;
use crate::utils::error::{GameError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// The oracle replies with `hint`, or `message` as a fallback.
#[derive(Debug, Deserialize)]
struct HintResponse {
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct HintClient {
    client: Client,
    endpoint: String,
}

impl HintClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl HintOracle for HintClient {
    async fn request_hint(&self, state: &HintContext) -> Result<String> {
        tracing::debug!(moves = state.moves, "requesting hint");
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(state)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GameError::HintError {
                status: response.status().as_u16(),
            });
        }

        let body: HintResponse = response.json().await?;
        body.hint
            .or(body.message)
            .ok_or_else(|| GameError::ProcessingError {
                message: "hint response carried neither hint nor message".to_string(),
            })
    }
}
