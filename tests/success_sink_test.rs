//! HTTP success sink tests against a mock receiver

use mockito::{Matcher, Server};
use std::sync::Arc;
use std::time::Duration;
use tallyman::adapters::notify::{Delivery, HttpSuccessSink, SignalKind, SuccessSink};
use tallyman::config::{RetryConfig, SuccessConfig};
use tallyman::core::completion::RunContext;
use tallyman::core::metrics::CompletionMetrics;
use tallyman::core::retry::{RetryExecutor, RetryPolicy};
use tallyman::domain::{CollectionName, RunId, SinkError};

fn context(topic: &str) -> RunContext {
    RunContext {
        run_id: RunId::new("correlation.id").unwrap(),
        collection: CollectionName::new(topic).unwrap(),
        export_date: "2020-01-01".to_string(),
        snapshot_type: "full".to_string(),
        environment: "staging".to_string(),
    }
}

fn config(url: String) -> SuccessConfig {
    SuccessConfig {
        url,
        request_timeout_seconds: 5,
        retry: RetryConfig::default(),
    }
}

fn fast_policy(max_attempts: usize) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        multiplier: 2.0,
        max_delay: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn test_collection_signal_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header("content-type", "application/octet-stream")
        .match_header("filename", "_core_toDo_successful.gz")
        .match_header("environment", "staging")
        .match_header("export_date", "2020-01-01")
        .match_header("database", "core")
        .match_header("collection", "toDo")
        .match_header("topic", "db.core.toDo")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let sink = HttpSuccessSink::with_policy(
        &config(format!("{}/upload", server.url())),
        RetryPolicy::no_retry(),
    )
    .unwrap();

    let delivery = sink
        .post_success_signal(SignalKind::Collection, &context("db.core.toDo"))
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::Posted);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_full_run_signal_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header("filename", "_correlation.id_successful.gz")
        .match_header("database", "NOT_APPLICABLE")
        .match_header("collection", "NOT_APPLICABLE")
        .match_header("topic", "NOT_APPLICABLE")
        .match_body(Matcher::Any)
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let sink = HttpSuccessSink::with_policy(
        &config(format!("{}/upload", server.url())),
        RetryPolicy::no_retry(),
    )
    .unwrap();

    let delivery = sink
        .post_success_signal(SignalKind::FullRun, &context("db.core.toDo"))
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::Posted);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_collection_signal_skipped_for_unsplittable_topic() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .expect(0)
        .create_async()
        .await;

    let sink = HttpSuccessSink::with_policy(
        &config(format!("{}/upload", server.url())),
        RetryPolicy::no_retry(),
    )
    .unwrap();

    let delivery = sink
        .post_success_signal(SignalKind::Collection, &context("standalone"))
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::Skipped);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejection_retried_until_exhausted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let metrics = Arc::new(CompletionMetrics::new());
    let executor = RetryExecutor::new(fast_policy(3)).with_metrics(metrics.clone());
    let sink = HttpSuccessSink::new(&config(format!("{}/upload", server.url())), executor).unwrap();

    let err = sink
        .post_success_signal(SignalKind::FullRun, &context("db.core.toDo"))
        .await
        .unwrap_err();

    match err {
        SinkError::Unavailable {
            operation,
            attempts,
            last_error,
        } => {
            assert_eq!(operation, "post_full_run_success");
            assert_eq!(attempts, 3);
            assert!(last_error.contains("503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(metrics.retries_for("post_full_run_success"), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_sink_is_connection_failure() {
    // Nothing listens on port 9 locally
    let sink = HttpSuccessSink::with_policy(
        &config("http://127.0.0.1:9/upload".to_string()),
        RetryPolicy::no_retry(),
    )
    .unwrap();

    let err = sink
        .post_success_signal(SignalKind::FullRun, &context("db.core.toDo"))
        .await
        .unwrap_err();

    assert!(matches!(err, SinkError::Unavailable { attempts: 1, .. }));
}
