//! Quotecache data transfer objects and configuration primitives.
//!
//! Everything in this crate is plain data: serializable, cloneable and free of
//! I/O. Behavior lives in `quotecache-core` and `quotecache`.
#![warn(missing_docs)]

mod config;
mod error;
mod favorite;
mod record;

pub use config::{QuoteCacheConfig, QuotaConfig, QuotaConsumptionStrategy, QuotaState};
pub use error::{FetchStage, QuoteCacheError, UpstreamError};
pub use favorite::Favorite;
pub use record::{CompanyOverview, DEFAULT_CHANGE_PERCENT, DEFAULT_MARKET_CAP, QuoteRecord};
