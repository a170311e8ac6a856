//! Fortune scan, merge and sort

use crate::db::{Connection, DbResult};
use crate::models::Fortune;

/// Load every fortune, add the request-time fortune and sort by message.
///
/// The sort is stable and compares messages by code point, so equal
/// messages keep their storage order. The whole list is built before
/// returning.
pub async fn collect(conn: &dyn Connection) -> DbResult<Vec<Fortune>> {
    let mut fortunes = conn.fortunes().await?;
    fortunes.push(Fortune::request_time());
    fortunes.sort_by(|a, b| a.message.cmp(&b.message));
    Ok(fortunes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::db::{ConnectionPool, DbError, MemoryPool, MemoryStore};
    use crate::models::fortune::EXTRA_FORTUNE_MESSAGE;

    async fn collect_from(store: MemoryStore) -> DbResult<Vec<Fortune>> {
        let pool = MemoryPool::new(Arc::new(store), 1);
        let conn = pool.acquire().await?;
        collect(&*conn).await
    }

    #[tokio::test]
    async fn empty_table_yields_only_the_extra_fortune() {
        let fortunes = collect_from(MemoryStore::new()).await.unwrap();
        assert_eq!(fortunes, vec![Fortune::request_time()]);
    }

    #[tokio::test]
    async fn extra_fortune_sorts_among_stored_rows() {
        let store = MemoryStore::new();
        store.insert_fortune(Fortune::new(1, "zzz"));
        store.insert_fortune(Fortune::new(2, "Aaa"));

        let fortunes = collect_from(store).await.unwrap();
        let messages: Vec<&str> = fortunes.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["Aaa", EXTRA_FORTUNE_MESSAGE, "zzz"]);
    }

    #[tokio::test]
    async fn ties_keep_storage_order() {
        let store = MemoryStore::new();
        store.insert_fortune(Fortune::new(7, "same"));
        store.insert_fortune(Fortune::new(3, "same"));

        let fortunes = collect_from(store).await.unwrap();
        let ids: Vec<i32> = fortunes.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![0, 7, 3]);
    }

    #[tokio::test]
    async fn benchmark_set_is_sorted_with_one_extra() {
        let store = MemoryStore::benchmark(&crate::random::SeededRandom::new(0));
        let fortunes = collect_from(store).await.unwrap();

        assert_eq!(fortunes.len(), 13);
        assert_eq!(fortunes.iter().filter(|f| f.id == 0).count(), 1);
        assert!(fortunes.windows(2).all(|w| w[0].message <= w[1].message));
        // Code point order puts ASCII before the Japanese row.
        assert_eq!(fortunes.last().map(|f| f.id), Some(12));
    }

    #[tokio::test]
    async fn scan_failure_propagates() {
        let store = MemoryStore::new();
        store.set_fail_reads(true);
        let err = collect_from(store).await.unwrap_err();
        assert!(matches!(err, DbError::Query(_)));
    }

    proptest! {
        #[test]
        fn prop_sorted_with_exactly_one_extra(messages in prop::collection::vec(".*", 0..40)) {
            let store = MemoryStore::new();
            for (i, message) in messages.iter().enumerate() {
                store.insert_fortune(Fortune::new(i as i32 + 1, message.clone()));
            }

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let fortunes = rt.block_on(collect_from(store)).unwrap();

            prop_assert_eq!(fortunes.len(), messages.len() + 1);
            prop_assert_eq!(fortunes.iter().filter(|f| f.id == 0).count(), 1);
            prop_assert!(fortunes.windows(2).all(|w| w[0].message <= w[1].message));
        }
    }
}
