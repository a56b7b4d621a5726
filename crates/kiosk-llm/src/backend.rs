use async_trait::async_trait;

use crate::error::Result;

/// A handle to one configured generation model.
///
/// Implementations perform the network call only; retry, fallback and rate
/// limiting live with the caller.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Model identifier this backend is bound to.
    fn model_id(&self) -> &str;

    /// Produce assistant text for one user input.
    async fn generate(&self, input: &str) -> Result<String>;
}
