pub mod chat;
pub mod memory;

use async_trait::async_trait;
use crate::error::Result;

pub use chat::ChatCompletionCorrector;
pub use memory::MemoryCorrector;

/// Trait for query correction backends (LLM chat completion, fixed table)
#[async_trait]
pub trait QueryCorrector: Send + Sync {
    /// Best-guess game title for an unmatched query.
    /// Transport, parse and empty-answer failures are errors.
    async fn correct(&self, query: &str) -> Result<String>;

    /// Get corrector name for logging
    fn name(&self) -> &str;
}
