use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A symbol saved by a user, keyed by `(user_id, symbol)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Opaque principal id supplied by the authentication boundary.
    pub user_id: String,
    /// Upper-case ticker.
    pub symbol: String,
    /// Display name captured when the favorite was added.
    #[serde(default)]
    pub company_name: String,
    /// When the favorite was added.
    pub created_at: DateTime<Utc>,
}
