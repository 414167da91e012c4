//! Translation dispatcher with a layered backend chain and multi-tier
//! caching.
//!
//! The core is [`application::dispatch::Dispatcher`]: resolve the source
//! language once, probe the cache, then try the local model, a secondary web
//! API, and a tertiary web API in fixed priority order. Results are cached in
//! a fast shared tier (Redis, optional) over a persistent SQLite tier; local
//! model handles stay in an in-process map.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod state;

pub use application::dispatch::{DispatchOptions, Dispatcher};
pub use domain::error::LingoError;
pub use domain::model::{validate_input, TranslationResult};
pub use infrastructure::storage::cache::TierCache;
