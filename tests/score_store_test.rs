use card_flip::{GameError, ScoreReporter, ScoreStoreClient, ScoreSummary};
use httpmock::prelude::*;

fn summary() -> ScoreSummary {
    ScoreSummary {
        player_name: "Mina".to_string(),
        moves: 12,
        matches: 16,
        elapsed_seconds: 95,
    }
}

#[tokio::test]
async fn submit_posts_store_payload_with_credentials() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/card_flip_scores")
            .header("apikey", "anon-key")
            .header("authorization", "Bearer anon-key")
            .header("prefer", "return=minimal")
            .json_body(serde_json::json!({
                "player_name": "Mina",
                "attempts": 12,
                "matches": 16,
                "elapsed_seconds": 95
            }));
        then.status(201);
    });

    let client = ScoreStoreClient::new(&server.base_url(), "anon-key");
    client.submit(&summary()).await.unwrap();

    mock.assert();
}

#[tokio::test]
async fn submit_maps_error_status_to_score_store_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/card_flip_scores");
        then.status(500);
    });

    let client = ScoreStoreClient::new(&server.base_url(), "anon-key");
    let err = client.submit(&summary()).await.unwrap_err();

    mock.assert();
    assert!(matches!(err, GameError::ScoreStoreError { status: 500 }));
}

#[tokio::test]
async fn fetch_recent_parses_entries_with_fallback_fields() {
    let server = MockServer::start();
    let rows = serde_json::json!([
        {
            "player_name": "Mina",
            "attempts": 12,
            "matches": 16,
            "elapsed_seconds": 95,
            "completed_at": "2026-08-01T10:15:00Z"
        },
        {
            "player_name": "Jun",
            "moves": 20,
            "matches": 16,
            "elapsed_seconds": 130,
            "created_at": "2026-07-30T08:00:00Z"
        }
    ]);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/card_flip_scores")
            .query_param("select", "*")
            .query_param("order", "completed_at.desc")
            .query_param("limit", "10")
            .header("apikey", "anon-key")
            .header("authorization", "Bearer anon-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(rows);
    });

    let client = ScoreStoreClient::new(&server.base_url(), "anon-key");
    let entries = client.fetch_recent(10).await.unwrap();

    mock.assert();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].player_name, "Mina");
    assert_eq!(entries[0].move_count(), Some(12));
    assert_eq!(entries[0].elapsed_seconds, Some(95));
    assert!(entries[0].finished_at().is_some());

    // Older rows without `attempts`/`completed_at` fall back.
    assert_eq!(entries[1].move_count(), Some(20));
    assert!(entries[1].finished_at().is_some());
}

#[tokio::test]
async fn fetch_recent_returns_empty_list_for_empty_store() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/card_flip_scores");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });

    // Trailing slash on the base URL must not break the path.
    let client = ScoreStoreClient::new(&format!("{}/", server.base_url()), "anon-key");
    let entries = client.fetch_recent(10).await.unwrap();

    mock.assert();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn fetch_recent_maps_error_status_to_score_store_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/card_flip_scores");
        then.status(503);
    });

    let client = ScoreStoreClient::new(&server.base_url(), "anon-key");
    let err = client.fetch_recent(10).await.unwrap_err();

    mock.assert();
    assert!(matches!(err, GameError::ScoreStoreError { status: 503 }));
}
