mod common;

use std::sync::Arc;

use seeker_core::auth::TokenStore;
use seeker_core::config::ClientConfig;
use seeker_core::history::HistoryRepository;
use seeker_core::result::ResultCache;
use seeker_core::session::SessionOutcome;
use seeker_interaction::{AnalysisClient, ApiClient, CreditBalance, StreamReader};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{Fixture, MemoryTokens};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_base_url: server.uri(),
        ..Default::default()
    }
}

const STREAM_BODY: &str = concat!(
    "data: {\"step\": \"chatID\", \"content\": \"S1\"}\n\n",
    "data: {\"step\": \"step\", \"messageContent\": \"## Find rivals\\nLooking for competitors\"}\n\n",
    "data: {\"step\": \"Main Competitors\", \"card_index\": 0, \"card_content\": {\"product_name\": \"Acme\", \"revenue_model\": [\"ads\", \"subscription\"]}}\n\n",
    "data: {\"step\": \"Done\"}\n\n",
);

#[tokio::test]
async fn test_stream_request_and_processing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("accept", "text/event-stream"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"query": "crm for dentists", "searchId": "tmp-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM_BODY, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    let mut session = fixture.session("crm for dentists", "tmp-1");
    let client = AnalysisClient::new(&config(&server))
        .unwrap()
        .with_token(Some("tok".into()));

    let report = client
        .run(&mut session, &StreamReader::new(), &CancellationToken::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.search_id, "S1");
    let envelope = fixture.cache.load("S1").unwrap().unwrap();
    assert_eq!(envelope.results.competitor(0).unwrap().revenue_model, "ads, subscription");
    let history = fixture.history.list().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query, "crm for dentists");
}

#[tokio::test]
async fn test_stream_http_error_still_finalizes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    let mut session = fixture.session("q", "tmp-1");
    let client = AnalysisClient::new(&config(&server)).unwrap();

    let err = client
        .run(&mut session, &StreamReader::new(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("bad gateway"));
    assert!(session.is_finalized());
    assert!(fixture.cache.load("tmp-1").unwrap().is_some());
    assert_eq!(fixture.history.list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_before_connect_aborts() {
    let server = MockServer::start().await;
    let fixture = Fixture::new();
    let mut session = fixture.session("q", "tmp-1");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = AnalysisClient::new(&config(&server))
        .unwrap()
        .run(&mut session, &StreamReader::new(), &cancel)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.outcome, SessionOutcome::Aborted);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-1"})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokens::default());
    let api = ApiClient::new(config(&server), tokens.clone()).unwrap();

    assert_eq!(api.login("a@b.c", "pw").await.unwrap(), "tok-1");
    assert_eq!(tokens.load().unwrap().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_unauthorized_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokens::default());
    let api = ApiClient::new(config(&server), tokens.clone()).unwrap();

    let err = api.login("a@b.c", "bad").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(tokens.load().unwrap().is_none());
}

#[tokio::test]
async fn test_credits_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/credits"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"credits": 42, "total": 100})))
        .mount(&server)
        .await;

    let api = ApiClient::new(config(&server), Arc::new(MemoryTokens::with("tok"))).unwrap();
    assert_eq!(
        api.credits().await.unwrap(),
        CreditBalance {
            remaining: 42,
            total: Some(100)
        }
    );
}

#[tokio::test]
async fn test_remote_history_list_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [{"id": "S1", "query": "crm", "timestamp": 1}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/history/S1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(config(&server), Arc::new(MemoryTokens::with("tok"))).unwrap();

    let history = api.list_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "S1");
    api.delete_history("S1").await.unwrap();
}

#[tokio::test]
async fn test_logout_clears_token_even_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokens::with("tok"));
    let api = ApiClient::new(config(&server), tokens.clone()).unwrap();

    assert!(api.logout().await.is_err());
    assert!(tokens.load().unwrap().is_none());
}

#[test]
fn test_google_auth_url() {
    let api = ApiClient::new(
        ClientConfig {
            api_base_url: "https://api.example.com/".into(),
            ..Default::default()
        },
        Arc::new(MemoryTokens::default()),
    )
    .unwrap();
    assert_eq!(api.google_auth_url(), "https://api.example.com/api/auth/google");
}
