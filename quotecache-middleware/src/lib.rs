#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod blacklist;
mod builder;
mod quota;

pub use crate::blacklist::{BlacklistMiddleware, BlacklistingClient};
pub use crate::builder::ClientBuilder;
pub use crate::quota::{QuotaAwareClient, QuotaMiddleware};
