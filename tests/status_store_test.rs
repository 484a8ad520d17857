//! Status store behaviour shared by every backend, exercised on the in-memory store

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tallyman::adapters::store::{InMemoryStatusStore, RetryingStatusStore, StatusStore};
use tallyman::core::completion::{CollectionCompletionEvaluator, RunCompletionEvaluator};
use tallyman::core::metrics::CompletionMetrics;
use tallyman::core::retry::{RetryExecutor, RetryPolicy};
use tallyman::domain::{CollectionName, CollectionStatus, RunId, StoreError};

fn run_id() -> RunId {
    RunId::new("123").unwrap()
}

fn collection(name: &str) -> CollectionName {
    CollectionName::new(format!("db.core.{name}")).unwrap()
}

fn fast_policy(max_attempts: usize) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        multiplier: 2.0,
        max_delay: Duration::from_millis(4),
    }
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let store = Arc::new(InMemoryStatusStore::new());
    let todo = collection("toDo");
    store.insert(&run_id(), &todo, CollectionStatus::Exported, 50, 0);

    let run = run_id();
    let increments = (0..50).map(|_| {
        let store = store.clone();
        let run = run.clone();
        let todo = todo.clone();
        tokio::spawn(async move { store.increment_files_sent(&run, &todo).await })
    });

    let mut returned: Vec<u64> = join_all(increments)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    returned.sort_unstable();

    assert_eq!(returned, (1..=50).collect::<Vec<u64>>());
    assert_eq!(store.record(&run_id(), &todo).unwrap().files_sent, 50);
}

#[tokio::test]
async fn test_last_increment_makes_collection_eligible() {
    let store = Arc::new(InMemoryStatusStore::new());
    let todo = collection("toDo");
    store.insert(&run_id(), &todo, CollectionStatus::Exported, 2, 0);

    let evaluator = CollectionCompletionEvaluator::new(store.clone());
    store.increment_files_sent(&run_id(), &todo).await.unwrap();
    assert!(!evaluator.try_mark_sent(&run_id(), &todo).await.unwrap());

    store.increment_files_sent(&run_id(), &todo).await.unwrap();
    assert!(evaluator.try_mark_sent(&run_id(), &todo).await.unwrap());
    assert_eq!(
        store.record(&run_id(), &todo).unwrap().status,
        CollectionStatus::Sent
    );
}

#[tokio::test]
async fn test_set_status_sent_is_idempotent() {
    let store = InMemoryStatusStore::new();
    let todo = collection("toDo");
    store.insert(&run_id(), &todo, CollectionStatus::Exported, 1, 1);

    store.set_status_sent(&run_id(), &todo).await.unwrap();
    store.set_status_sent(&run_id(), &todo).await.unwrap();

    let record = store.record(&run_id(), &todo).unwrap();
    assert_eq!(record.status, CollectionStatus::Sent);
    assert_eq!(record.files_sent, 1);
}

#[tokio::test]
async fn test_writes_to_missing_record_fail() {
    let store = InMemoryStatusStore::new();
    let todo = collection("toDo");

    let err = store.increment_files_sent(&run_id(), &todo).await.unwrap_err();
    assert!(matches!(err, StoreError::RecordNotFound { .. }));

    let err = store.set_status_sent(&run_id(), &todo).await.unwrap_err();
    assert!(matches!(err, StoreError::RecordNotFound { .. }));
}

#[tokio::test]
async fn test_missing_attributes_read_as_defaults() {
    let store = InMemoryStatusStore::new();
    let todo = collection("toDo");
    store.insert_raw(&run_id(), &todo, None, None, None);

    let record = store.get(&run_id(), &todo).await.unwrap();
    assert_eq!(record.status, CollectionStatus::Unknown(String::new()));
    assert_eq!(record.files_exported, 0);
    assert_eq!(record.files_sent, 0);
}

#[tokio::test]
async fn test_counts_are_scoped_to_run() {
    let store = InMemoryStatusStore::new();
    let other_run = RunId::new("456").unwrap();
    store.insert(&run_id(), &collection("a"), CollectionStatus::Exporting, 0, 0);
    store.insert(&run_id(), &collection("b"), CollectionStatus::Exported, 3, 1);
    store.insert(&run_id(), &collection("c"), CollectionStatus::Exported, 0, 0);
    store.insert(&other_run, &collection("a"), CollectionStatus::Exporting, 0, 0);

    assert_eq!(store.count_exporting(&run_id()).await.unwrap(), Some(1));
    assert_eq!(store.count_pending_send(&run_id()).await.unwrap(), Some(1));
    assert_eq!(store.count_exporting(&other_run).await.unwrap(), Some(1));
    assert_eq!(store.count_pending_send(&other_run).await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_retrying_store_rides_out_transient_failures() {
    let metrics = Arc::new(CompletionMetrics::new());
    let store = RetryingStatusStore::new(
        InMemoryStatusStore::new(),
        RetryExecutor::new(fast_policy(5)).with_metrics(metrics.clone()),
    );
    let todo = collection("toDo");
    store
        .inner()
        .insert(&run_id(), &todo, CollectionStatus::Exported, 4, 3);
    store.inner().fail_next(2);

    let files_sent = store.increment_files_sent(&run_id(), &todo).await.unwrap();

    assert_eq!(files_sent, 4);
    assert_eq!(store.inner().calls(), 3);
    assert_eq!(metrics.retries_for("increment_files_sent"), 2);
}

#[tokio::test]
async fn test_retrying_store_gives_up_after_max_attempts() {
    let store = RetryingStatusStore::new(
        InMemoryStatusStore::new(),
        RetryExecutor::new(fast_policy(3)),
    );
    store.inner().fail_next(10);

    let err = store.count_exporting(&run_id()).await.unwrap_err();

    match err {
        StoreError::Unavailable {
            operation,
            attempts,
            last_error,
        } => {
            assert_eq!(operation, "count_exporting");
            assert_eq!(attempts, 3);
            assert!(last_error.contains("injected failure"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.inner().calls(), 3);
}

#[tokio::test]
async fn test_run_evaluation_after_last_collection_sent() {
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&run_id(), &collection("a"), CollectionStatus::Sent, 2, 2);
    store.insert(&run_id(), &collection("b"), CollectionStatus::Exported, 1, 1);

    let collections = CollectionCompletionEvaluator::new(store.clone());
    let run = RunCompletionEvaluator::new(store.clone());

    assert!(!run.run_is_complete(&run_id()).await.unwrap());
    collections
        .set_collection_status(&run_id(), &collection("b"))
        .await
        .unwrap();
    assert!(run.run_is_complete(&run_id()).await.unwrap());
}
