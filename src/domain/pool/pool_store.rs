//! Working and published pair maps

use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::shared::types::{DexLiquidity, PairSnapshot, PoolRecord};

#[derive(Default)]
struct WorkingSet {
    cycle: u64,
    seen: HashSet<String>,
    pairs: BTreeMap<String, PoolRecord>,
}

/// Pair map built by one writer per cycle and read by many.
///
/// Readers only ever see a snapshot swapped in by [`PairStore::publish`];
/// the map under construction is never visible.
pub struct PairStore {
    working: Mutex<WorkingSet>,
    published: RwLock<Arc<PairSnapshot>>,
}

impl PairStore {
    pub fn new() -> Self {
        Self {
            working: Mutex::new(WorkingSet::default()),
            published: RwLock::new(Arc::new(PairSnapshot::default())),
        }
    }

    /// Drop whatever the previous cycle left behind and start numbering a new one.
    pub async fn begin_cycle(&self) -> u64 {
        let mut working = self.working.lock().await;
        working.cycle += 1;
        working.seen.clear();
        working.pairs.clear();
        working.cycle
    }

    /// Record `key` as discovered this cycle. False if it already was.
    pub async fn mark_seen(&self, key: &str) -> bool {
        self.working.lock().await.seen.insert(key.to_string())
    }

    pub async fn upsert(&self, key: &str, record: PoolRecord) {
        self.working.lock().await.pairs.insert(key.to_string(), record);
    }

    /// Attach order book data to a pair created earlier this cycle.
    pub async fn attach_dex(&self, key: &str, dex: DexLiquidity) -> bool {
        match self.working.lock().await.pairs.get_mut(key) {
            Some(record) => {
                record.dex = Some(dex);
                true
            }
            None => false,
        }
    }

    pub async fn working_len(&self) -> usize {
        self.working.lock().await.pairs.len()
    }

    /// Swap the working map in as the visible snapshot.
    pub async fn publish(&self) -> Arc<PairSnapshot> {
        let snapshot = {
            let mut working = self.working.lock().await;
            Arc::new(PairSnapshot {
                cycle: working.cycle,
                published_at: Some(Utc::now()),
                pairs: std::mem::take(&mut working.pairs),
            })
        };
        *self.published.write().await = Arc::clone(&snapshot);
        snapshot
    }

    /// Currently published snapshot
    pub async fn snapshot(&self) -> Arc<PairSnapshot> {
        Arc::clone(&*self.published.read().await)
    }
}

impl Default for PairStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::{Asset, DexAmount};

    fn record() -> PoolRecord {
        PoolRecord::new(Asset::native(), Asset::native())
    }

    #[tokio::test]
    async fn test_snapshot_starts_empty() {
        let store = PairStore::new();
        let snapshot = store.snapshot().await;
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.cycle, 0);
        assert!(snapshot.published_at.is_none());
    }

    #[tokio::test]
    async fn test_dedup_within_cycle_resets_between_cycles() {
        let store = PairStore::new();
        store.begin_cycle().await;
        assert!(store.mark_seen("k").await);
        assert!(!store.mark_seen("k").await);

        store.begin_cycle().await;
        assert!(store.mark_seen("k").await);
    }

    #[tokio::test]
    async fn test_working_map_invisible_until_publish() {
        let store = PairStore::new();
        store.begin_cycle().await;
        store.upsert("k1", record()).await;
        store.publish().await;

        let cycle = store.begin_cycle().await;
        assert_eq!(cycle, 2);
        store.upsert("k2", record()).await;
        store.upsert("k3", record()).await;

        let visible = store.snapshot().await;
        assert_eq!(visible.cycle, 1);
        assert_eq!(visible.pairs.keys().collect::<Vec<_>>(), vec!["k1"]);

        let published = store.publish().await;
        assert_eq!(published.cycle, 2);
        assert_eq!(store.snapshot().await.pairs.keys().collect::<Vec<_>>(), vec!["k2", "k3"]);
        assert_eq!(store.working_len().await, 0);
    }

    #[tokio::test]
    async fn test_attach_dex_requires_existing_record() {
        let store = PairStore::new();
        store.begin_cycle().await;
        let dex = DexLiquidity {
            amount1: DexAmount::Native(1.0),
            amount2: DexAmount::Native(2.0),
            offer_count: 1,
        };
        assert!(!store.attach_dex("missing", dex.clone()).await);

        store.upsert("k", record()).await;
        assert!(store.attach_dex("k", dex.clone()).await);
        let published = store.publish().await;
        assert_eq!(published.pairs["k"].dex, Some(dex));
    }
}
