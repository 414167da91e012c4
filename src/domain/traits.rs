use crate::domain::error::LingoError;
use async_trait::async_trait;
use std::sync::Arc;

/// One externally-provided translation capability, tried in priority order.
///
/// Implementations must return a typed error on failure so the dispatcher can
/// log it and advance the chain; they never return a success carrying an
/// empty string in place of an error.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Stable identifier recorded in `TranslationResult::method`.
    fn id(&self) -> &'static str;

    /// Translate `text` from `source` to `target`. `source` is always a
    /// concrete language code, never "auto".
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, LingoError>;
}

/// A loaded sequence-to-sequence model for one language pair.
///
/// Handles are held in an in-process map only; they are never serialized or
/// shared across process boundaries.
pub trait PairModel: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, LingoError>;
}

/// Materializes a `PairModel` for a model identifier on first use.
///
/// The inference runtime behind a loader is a collaborator of this crate,
/// not part of it; tests and embedders supply their own implementations.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn PairModel>, LingoError>;
}
