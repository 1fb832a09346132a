use std::sync::Arc;

use pretty_assertions::assert_eq;
use seeker_application::{HistoryUseCase, SearchOutcome, SearchRequest, SearchUseCase};
use seeker_core::config::ClientConfig;
use seeker_core::history::HistoryRepository;
use seeker_core::result::{LogicStep, ResultCache, SearchResult};
use seeker_core::session::{NoopSink, SessionOutcome};
use seeker_infrastructure::{JsonHistoryRepository, JsonResultCache, SeekerPaths};
use seeker_interaction::AnalysisClient;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Env {
    _dir: TempDir,
    cache: Arc<JsonResultCache>,
    history: Arc<JsonHistoryRepository>,
}

fn env() -> Env {
    let dir = TempDir::new().unwrap();
    let paths = SeekerPaths::new(Some(dir.path()));
    Env {
        cache: Arc::new(JsonResultCache::new(&paths).unwrap()),
        history: Arc::new(JsonHistoryRepository::new(&paths).unwrap()),
        _dir: dir,
    }
}

fn usecase(env: &Env, server: &MockServer) -> SearchUseCase {
    let client = AnalysisClient::new(&ClientConfig {
        api_base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();
    SearchUseCase::new(env.cache.clone(), env.history.clone(), client)
}

#[tokio::test]
async fn test_cached_result_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let env = env();
    let mut result = SearchResult::new();
    result.push_logic_step(LogicStep {
        title: "Find rivals".into(),
        description: String::new(),
    });
    env.cache.save("S1", "crm for dentists", &result).unwrap();

    let outcome = usecase(&env, &server)
        .search(
            SearchRequest::new("ignored").with_search_id("S1"),
            Arc::new(NoopSink),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let SearchOutcome::Cached { envelope, .. } = outcome else {
        panic!("expected a cache hit");
    };
    assert_eq!(envelope.results, result);
    let history = env.history.list().unwrap();
    assert_eq!(history[0].id, "S1");
    assert_eq!(history[0].description, "Find rivals");
}

#[tokio::test]
async fn test_cache_miss_streams_and_persists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            concat!(
                "data: {\"step\": \"chatID\", \"content\": \"abc123\"}\n",
                "data: {\"step\": \"Done\"}\n",
            ),
            "text/event-stream",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let env = env();
    let outcome = usecase(&env, &server)
        .search(
            SearchRequest::new("crm").with_search_id("provisional"),
            Arc::new(NoopSink),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let SearchOutcome::Streamed(report) = outcome else {
        panic!("expected a streamed search");
    };
    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.search_id, "abc123");
    assert!(env.cache.load("abc123").unwrap().is_some());
    assert_eq!(env.history.list().unwrap()[0].id, "abc123");
}

#[tokio::test]
async fn test_transport_failure_is_reported_after_persisting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let env = env();
    let err = usecase(&env, &server)
        .search(
            SearchRequest::new("crm").with_search_id("tmp-1"),
            Arc::new(NoopSink),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    let cause = err.downcast_ref::<seeker_core::SeekerError>().unwrap();
    assert!(cause.is_transport());
    assert_eq!(env.history.list().unwrap()[0].id, "tmp-1");
}

#[test]
fn test_history_clear_with_purge() {
    let env = env();
    env.cache.save("a", "q", &SearchResult::new()).unwrap();
    env.cache.save("b", "q", &SearchResult::new()).unwrap();
    env.history
        .append(seeker_core::history::HistoryEntry::new("a", "q"))
        .unwrap();

    let usecase = HistoryUseCase::new(env.history.clone(), env.cache.clone());
    assert_eq!(usecase.list().unwrap().len(), 1);

    usecase.forget("a", true).unwrap();
    assert!(env.cache.load("a").unwrap().is_none());
    assert!(usecase.list().unwrap().is_empty());

    assert_eq!(usecase.clear(false).unwrap(), 0);
    assert_eq!(usecase.clear(true).unwrap(), 1);
    assert!(env.cache.list_ids().unwrap().is_empty());
}
