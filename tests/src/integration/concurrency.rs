//! # Concurrency
//!
//! One store resolution shared by concurrent calls, push-stream input fed
//! from another task, early cancellation and input failures.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use doc_stream::{
        create, Adapter, AdapterConfig, AdapterError, Batch, DocInput, MemoryDocStore, StoreArg,
        StoreValue, WriteOptions,
    };
    use doc_types::{DocRef, StoreError, VersionedDoc};
    use futures::{StreamExt, TryStreamExt};
    use tokio::sync::{mpsc, oneshot};
    use tokio_stream::wrappers::ReceiverStream;

    use crate::support::{init_logs, slow_doc, CheckedStore, SlowStore};

    fn counted_store(store: Arc<MemoryDocStore>, resolutions: Arc<AtomicUsize>) -> StoreArg {
        StoreArg::deferred(async move {
            resolutions.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, StoreError>(StoreValue::from(store))
        })
    }

    // =============================================================================
    // SHARED RESOLUTION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_share_one_resolution() {
        init_logs();
        let store = Arc::new(MemoryDocStore::new());
        let resolutions = Arc::new(AtomicUsize::new(0));
        let adapter = Adapter::new(counted_store(store.clone(), resolutions.clone())).unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let adapter = adapter.clone();
                tokio::spawn(async move {
                    adapter
                        .write(VersionedDoc::new(format!("doc-{}", i)))
                        .try_collect::<Vec<DocRef>>()
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().len(), 1);
        }

        assert_eq!(resolutions.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 16);
    }

    #[tokio::test]
    async fn test_resolution_waits_for_first_call() {
        let resolutions = Arc::new(AtomicUsize::new(0));
        let adapter =
            Adapter::new(counted_store(Arc::new(MemoryDocStore::new()), resolutions.clone()))
                .unwrap();

        let pending = adapter.write(VersionedDoc::new("a"));
        tokio::task::yield_now().await;
        assert_eq!(resolutions.load(Ordering::SeqCst), 0);

        let refs: Vec<_> = pending.try_collect().await.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(resolutions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_is_validated_once_across_calls() {
        let store = Arc::new(CheckedStore::new());
        let adapter = Adapter::new(store.clone()).unwrap();

        for id in ["a", "b", "c"] {
            let written: Vec<DocRef> =
                adapter.write(VersionedDoc::new(id)).try_collect().await.unwrap();
            assert_eq!(written.len(), 1);
        }
        let read: Vec<VersionedDoc> = adapter
            .read(vec![VersionedDoc::new("a"), VersionedDoc::new("c")])
            .try_collect()
            .await
            .unwrap();

        assert_eq!(read.len(), 2);
        assert_eq!(store.checks(), 1);
    }

    #[tokio::test]
    async fn test_deferred_failure_reaches_every_pending_call() {
        let resolutions = Arc::new(AtomicUsize::new(0));
        let counter = resolutions.clone();
        let (release, gate) = oneshot::channel::<()>();
        let adapter = Adapter::new(StoreArg::deferred(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = gate.await;
            Err::<StoreValue, _>(StoreError::Unavailable("connection refused".into()))
        }))
        .unwrap();

        let write = tokio::spawn(adapter.write(VersionedDoc::new("a")).collect::<Vec<_>>());
        let read = tokio::spawn(adapter.read(VersionedDoc::new("b")).collect::<Vec<_>>());
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(!write.is_finished());
        assert!(!read.is_finished());
        assert_eq!(resolutions.load(Ordering::SeqCst), 1);

        release.send(()).unwrap();
        let expected = AdapterError::StoreUnavailable(StoreError::Unavailable(
            "connection refused".into(),
        ));

        assert_eq!(write.await.unwrap(), vec![Err(expected.clone())]);
        assert_eq!(read.await.unwrap(), vec![Err(expected)]);
        assert_eq!(resolutions.load(Ordering::SeqCst), 1);
    }

    // =============================================================================
    // PUSH-STREAM INPUT
    // =============================================================================

    #[tokio::test]
    async fn test_push_stream_fed_from_another_task() {
        let store = Arc::new(MemoryDocStore::new());
        let adapter = Adapter::new(store.clone()).unwrap();
        let (tx, rx) = mpsc::channel(4);

        let producer = tokio::spawn(async move {
            tx.send(Batch::One(VersionedDoc::new("a"))).await.unwrap();
            tx.send(Batch::Many(vec![VersionedDoc::new("b"), VersionedDoc::new("c")]))
                .await
                .unwrap();
            tx.send(Batch::Many(vec![])).await.unwrap();
            tx.send(Batch::One(VersionedDoc::new("d"))).await.unwrap();
        });

        let refs: Vec<DocRef> = adapter
            .write(DocInput::stream(ReceiverStream::new(rx)))
            .try_collect()
            .await
            .unwrap();
        producer.await.unwrap();

        let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_failing_input_ends_stream_and_adapter_stays_usable() {
        let store = Arc::new(MemoryDocStore::new());
        let config = AdapterConfig::new().with_write(WriteOptions::new().with_batch_size(1));
        let adapter = create(store.clone(), config).unwrap();

        let input = DocInput::try_stream(futures::stream::iter(vec![
            Ok(Batch::One(VersionedDoc::new("a"))),
            Err("upstream closed"),
            Ok(Batch::One(VersionedDoc::new("never"))),
        ]));
        let results: Vec<_> = adapter.write(input).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().id, "a");
        assert_eq!(results[1], Err(AdapterError::Input("upstream closed".into())));
        assert_eq!(store.len(), 1);

        let refs: Vec<_> = adapter.write(VersionedDoc::new("b")).try_collect().await.unwrap();
        assert_eq!(refs.len(), 1);
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_dropping_result_stream_stops_pending_writes() {
        let store = Arc::new(SlowStore::new());
        let config = AdapterConfig::new()
            .with_write(WriteOptions::new().with_batch_size(1).with_concurrency(2));
        let adapter = create(store.clone(), config).unwrap();
        let docs: Vec<_> = (0..8).map(|i| slow_doc(&format!("doc-{}", i), 10)).collect();

        let first: Vec<_> = adapter.write(docs).take(1).collect().await;

        assert_eq!(first.len(), 1);
        assert!(first[0].is_ok());
        assert!(store.calls() < 8);

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(store.completion_order().len() < 8);
    }
}
