//! Mapping of resolver and favorites outcomes to HTTP-shaped responses.
//!
//! Nothing here depends on a web framework. A handler forwards the path
//! parameter, principal and body it received and copies the returned
//! [`ApiResponse`] onto the wire.
//!
//! An upstream failure for a directly requested symbol is reported as 404,
//! whether the provider does not know the symbol or could not be reached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use quotecache_core::{Favorite, QuoteCacheError, QuoteRecord, normalize_symbol};

use crate::{Favorites, QuoteCache};

/// Headers attached to every response.
pub const RESPONSE_HEADERS: [(&str, &str); 3] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Credentials", "true"),
];

/// Status code, headers and JSON body of one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Response with the standard headers.
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: RESPONSE_HEADERS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body,
        }
    }

    fn message(status: u16, msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::new(status, json!({ "message": msg }))
    }

    /// Value of header `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn internal(err: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::message(500, "Internal server error")
    }

    fn from_error(err: &QuoteCacheError, symbol: Option<&str>) -> Self {
        match err {
            QuoteCacheError::UpstreamFetchFailed { symbol: s, .. } => {
                let s = symbol.unwrap_or(s.as_str());
                Self::message(404, format!("Stock data for {s} not found"))
            }
            QuoteCacheError::InvalidArg(msg) => Self::message(400, msg.clone()),
            QuoteCacheError::Unauthorized => Self::message(401, "Unauthorized"),
            other => Self::internal(other),
        }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self::new(status, body),
            Err(e) => Self::internal(&e),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddFavoriteRequest {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
}

#[derive(Serialize)]
struct StocksBody<'a> {
    stocks: &'a [QuoteRecord],
}

#[derive(Serialize)]
struct FavoritesBody<'a> {
    favorites: &'a [Favorite],
}

/// Stock and favorites endpoints.
pub struct QuoteApi {
    cache: Arc<QuoteCache>,
    favorites: Favorites,
}

impl QuoteApi {
    /// Endpoints backed by `cache` and `favorites`.
    #[must_use]
    pub const fn new(cache: Arc<QuoteCache>, favorites: Favorites) -> Self {
        Self { cache, favorites }
    }

    /// `GET /stocks/{symbol}` and `GET /stocks`.
    ///
    /// With a symbol, resolves the full record: 200 with the record, 404 if it
    /// cannot be fetched, 400 for a blank symbol. Without one (or with an empty
    /// path parameter), returns the popular list as `{"stocks": [...]}`.
    pub async fn get_stock(&self, symbol: Option<&str>) -> ApiResponse {
        match symbol.filter(|s| !s.is_empty()) {
            Some(raw) => {
                let normalized = normalize_symbol(raw);
                match self.cache.resolve_one(raw).await {
                    Ok(record) => ApiResponse::json(200, &record),
                    Err(e) => ApiResponse::from_error(&e, normalized.as_deref()),
                }
            }
            None => {
                let stocks = self.cache.popular().await;
                ApiResponse::json(200, &StocksBody { stocks: &stocks })
            }
        }
    }

    /// `GET /favorites`: 200 with `{"favorites": [...]}`.
    pub async fn list_favorites(&self, principal: Option<&str>) -> ApiResponse {
        match self.favorites.list(principal).await {
            Ok(favorites) => ApiResponse::json(
                200,
                &FavoritesBody {
                    favorites: &favorites,
                },
            ),
            Err(e) => ApiResponse::from_error(&e, None),
        }
    }

    /// `POST /favorites` with a JSON body `{"symbol": ..., "companyName": ...}`.
    ///
    /// 201 on success, 400 if the body is not JSON or has no symbol.
    pub async fn add_favorite(&self, principal: Option<&str>, body: Option<&str>) -> ApiResponse {
        if principal.is_none_or(|p| p.trim().is_empty()) {
            return ApiResponse::from_error(&QuoteCacheError::Unauthorized, None);
        }
        let req: AddFavoriteRequest = match serde_json::from_str(body.unwrap_or("{}")) {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!(error = %e, "rejecting favorite body");
                return ApiResponse::message(400, "Invalid request body");
            }
        };
        let Some(symbol) = req.symbol.filter(|s| !s.trim().is_empty()) else {
            return ApiResponse::message(400, "Symbol is required");
        };
        match self
            .favorites
            .add(principal, &symbol, req.company_name.as_deref())
            .await
        {
            Ok(_) => ApiResponse::message(201, "Favorite added successfully"),
            Err(e) => ApiResponse::from_error(&e, None),
        }
    }

    /// `DELETE /favorites/{symbol}`: 200 on success, 400 without a symbol.
    pub async fn remove_favorite(&self, principal: Option<&str>, symbol: Option<&str>) -> ApiResponse {
        match self.favorites.remove(principal, symbol.unwrap_or_default()).await {
            Ok(()) => ApiResponse::message(200, "Favorite removed successfully"),
            Err(e) => ApiResponse::from_error(&e, None),
        }
    }
}
