use std::sync::Arc;

use quotecache_core::{
    Clock, Favorite, FavoritesStore, QuoteCacheError, StoreError, SystemClock, normalize_symbol,
};

/// Per-user favorite symbols.
///
/// The principal comes from whatever authentication sits in front of this
/// service; `None` or an empty id is rejected as `Unauthorized`. Favorites are
/// primary data, so store failures are returned to the caller as `Storage`.
pub struct Favorites {
    store: Arc<dyn FavoritesStore>,
    clock: Arc<dyn Clock>,
}

impl Favorites {
    /// Service over `store`, stamping `created_at` with the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Service over `store` with an explicit clock.
    #[must_use]
    pub fn with_clock(store: Arc<dyn FavoritesStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// All favorites of `principal`.
    ///
    /// # Errors
    /// `Unauthorized` without a principal, `Storage` if the store fails.
    #[tracing::instrument(name = "quotecache::favorites::list", skip(self))]
    pub async fn list(&self, principal: Option<&str>) -> Result<Vec<Favorite>, QuoteCacheError> {
        let user_id = require_principal(principal)?;
        self.store.list(user_id).await.map_err(storage)
    }

    /// Save `symbol` for `principal`, replacing an existing entry.
    ///
    /// # Errors
    /// `Unauthorized` without a principal, `InvalidArg` for a blank symbol,
    /// `Storage` if the store fails.
    #[tracing::instrument(name = "quotecache::favorites::add", skip(self))]
    pub async fn add(
        &self,
        principal: Option<&str>,
        symbol: &str,
        company_name: Option<&str>,
    ) -> Result<Favorite, QuoteCacheError> {
        let user_id = require_principal(principal)?;
        let symbol = require_symbol(symbol)?;
        let favorite = Favorite {
            user_id: user_id.to_string(),
            symbol,
            company_name: company_name.unwrap_or_default().to_string(),
            created_at: self.clock.now(),
        };
        self.store.put(&favorite).await.map_err(storage)?;
        tracing::debug!(user_id, symbol = %favorite.symbol, "favorite added");
        Ok(favorite)
    }

    /// Remove `symbol` from the favorites of `principal`. Removing a symbol
    /// that is not saved succeeds.
    ///
    /// # Errors
    /// `Unauthorized` without a principal, `InvalidArg` for a blank symbol,
    /// `Storage` if the store fails.
    #[tracing::instrument(name = "quotecache::favorites::remove", skip(self))]
    pub async fn remove(&self, principal: Option<&str>, symbol: &str) -> Result<(), QuoteCacheError> {
        let user_id = require_principal(principal)?;
        let symbol = require_symbol(symbol)?;
        self.store.delete(user_id, &symbol).await.map_err(storage)
    }
}

fn require_principal(principal: Option<&str>) -> Result<&str, QuoteCacheError> {
    match principal {
        Some(p) if !p.trim().is_empty() => Ok(p),
        _ => Err(QuoteCacheError::Unauthorized),
    }
}

fn require_symbol(symbol: &str) -> Result<String, QuoteCacheError> {
    normalize_symbol(symbol).ok_or_else(|| QuoteCacheError::invalid_arg("Symbol is required"))
}

fn storage(e: StoreError) -> QuoteCacheError {
    tracing::error!(error = %e, "favorites store failed");
    QuoteCacheError::Storage(e.to_string())
}
