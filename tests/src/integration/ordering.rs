//! # Output Ordering
//!
//! Store calls may finish in any order; result streams follow input order.
//! Time is paused so delays are deterministic.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use doc_stream::{create, Adapter, AdapterConfig, ReadOptions, WriteOptions};
    use doc_types::{DocRef, VersionedDoc};
    use futures::TryStreamExt;
    use proptest::prelude::*;

    use crate::support::{init_logs, slow_doc, SlowStore};

    fn one_at_a_time(concurrency: usize) -> AdapterConfig {
        AdapterConfig::new()
            .with_write(WriteOptions::new().with_batch_size(1).with_concurrency(concurrency))
            .with_read(ReadOptions::new().with_batch_size(1).with_concurrency(concurrency))
    }

    fn ids(docs: &[VersionedDoc]) -> Vec<String> {
        docs.iter().map(|d| d.id.clone()).collect()
    }

    async fn write_and_read(
        store: Arc<SlowStore>,
        docs: Vec<VersionedDoc>,
        concurrency: usize,
    ) -> (Vec<DocRef>, Vec<VersionedDoc>) {
        let adapter: Adapter = create(store, one_at_a_time(concurrency)).unwrap();
        let refs: Vec<DocRef> = adapter.write(docs).try_collect().await.unwrap();
        let read: Vec<VersionedDoc> = adapter.read(refs.clone()).try_collect().await.unwrap();
        (refs, read)
    }

    // =============================================================================
    // DETERMINISTIC
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_write_results_follow_input_order_not_completion_order() {
        init_logs();
        let store = Arc::new(SlowStore::new());
        let docs: Vec<_> = (0..5u64)
            .map(|i| slow_doc(&format!("doc-{}", i), (5 - i) * 10))
            .collect();
        let expected = ids(&docs);

        let adapter = create(store.clone(), one_at_a_time(5)).unwrap();
        let refs: Vec<DocRef> = adapter.write(docs).try_collect().await.unwrap();

        let written: Vec<_> = refs.into_iter().map(|r| r.id).collect();
        assert_eq!(written, expected);

        let mut reversed = expected.clone();
        reversed.reverse();
        assert_eq!(store.completion_order(), reversed);
        assert_eq!(store.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_results_follow_input_order() {
        let store = Arc::new(SlowStore::new());
        let docs = vec![slow_doc("slow", 50), slow_doc("fast", 1), slow_doc("medium", 20)];
        let expected = ids(&docs);

        let (_, read) = write_and_read(store.clone(), docs, 3).await;

        assert_eq!(ids(&read), expected);
        // Writes then reads both complete fastest first.
        let completed = store.completion_order();
        assert_eq!(completed[..3], ["fast", "medium", "slow"]);
        assert_eq!(completed[3..], ["fast", "medium", "slow"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_one_runs_sequentially() {
        let store = Arc::new(SlowStore::new());
        let docs = vec![slow_doc("a", 30), slow_doc("b", 10), slow_doc("c", 20)];

        let adapter = create(store.clone(), one_at_a_time(1)).unwrap();
        let _: Vec<DocRef> = adapter.write(docs).try_collect().await.unwrap();

        assert_eq!(store.completion_order(), ["a", "b", "c"]);
    }

    // =============================================================================
    // PROPERTY
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_order_survives_random_delays(
            delays in prop::collection::vec(0u64..50, 1..12),
            concurrency in 1usize..6,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            let docs: Vec<_> = delays
                .iter()
                .enumerate()
                .map(|(i, delay)| slow_doc(&format!("doc-{:02}", i), *delay))
                .collect();
            let expected = ids(&docs);

            let store = Arc::new(SlowStore::new());
            let (refs, read) = runtime.block_on(write_and_read(store, docs, concurrency));

            let written: Vec<_> = refs.into_iter().map(|r| r.id).collect();
            prop_assert_eq!(&written, &expected);
            prop_assert_eq!(ids(&read), expected);
        }
    }
}
