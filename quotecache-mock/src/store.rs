use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use quotecache_core::{Favorite, FavoritesStore, QuoteRecord, QuoteStore, StoreError};

/// One recorded quote-store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get(String),
    Put(String),
}

/// In-memory `QuoteStore` holding records as JSON documents.
///
/// Records go through the same serde representation a document database
/// would see, so partial and full records round-trip exactly as in
/// production. Reads and writes can be switched to fail independently.
#[derive(Default)]
pub struct MemoryQuoteStore {
    docs: Mutex<HashMap<String, serde_json::Value>>,
    ops: Mutex<Vec<StoreOp>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryQuoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `put` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a record without logging an operation.
    ///
    /// # Panics
    /// Panics if the record cannot be encoded as JSON.
    pub async fn seed(&self, record: &QuoteRecord) {
        let doc = serde_json::to_value(record).expect("record encodes");
        self.docs.lock().await.insert(record.symbol.clone(), doc);
    }

    /// Insert a raw document, e.g. one written by an older schema.
    pub async fn seed_raw(&self, symbol: &str, doc: serde_json::Value) {
        self.docs.lock().await.insert(symbol.to_string(), doc);
    }

    /// Stored document for `symbol`, bypassing failure switches and the op log.
    pub async fn raw(&self, symbol: &str) -> Option<serde_json::Value> {
        self.docs.lock().await.get(symbol).cloned()
    }

    /// Operations observed so far, in order.
    pub async fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().await.clone()
    }

    /// Number of `put` calls observed so far, including failed ones.
    pub async fn put_count(&self) -> usize {
        self.ops
            .lock()
            .await
            .iter()
            .filter(|op| matches!(op, StoreOp::Put(_)))
            .count()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn get(&self, symbol: &str) -> Result<Option<QuoteRecord>, StoreError> {
        self.ops.lock().await.push(StoreOp::Get(symbol.to_string()));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("read refused".to_string()));
        }
        let doc = self.docs.lock().await.get(symbol).cloned();
        doc.map(|d| {
            serde_json::from_value(d).map_err(|e| StoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn put(&self, record: &QuoteRecord) -> Result<(), StoreError> {
        self.ops
            .lock()
            .await
            .push(StoreOp::Put(record.symbol.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write refused".to_string()));
        }
        let doc =
            serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.docs.lock().await.insert(record.symbol.clone(), doc);
        Ok(())
    }
}

/// In-memory `FavoritesStore`; lists come back ordered by symbol.
#[derive(Default)]
pub struct MemoryFavoritesStore {
    rows: Mutex<BTreeMap<(String, String), Favorite>>,
    fail: AtomicBool,
}

impl MemoryFavoritesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("favorites table unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn put(&self, favorite: &Favorite) -> Result<(), StoreError> {
        self.check()?;
        self.rows.lock().await.insert(
            (favorite.user_id.clone(), favorite.symbol.clone()),
            favorite.clone(),
        );
        Ok(())
    }

    async fn delete(&self, user_id: &str, symbol: &str) -> Result<(), StoreError> {
        self.check()?;
        self.rows
            .lock()
            .await
            .remove(&(user_id.to_string(), symbol.to_string()));
        Ok(())
    }
}
