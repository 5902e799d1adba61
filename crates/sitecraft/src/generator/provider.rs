use async_trait::async_trait;

use super::error::GenerationError;

/// A service that turns a free-text description into an HTML document.
#[async_trait]
pub trait SiteGenerator: Send + Sync {
    /// Generate one document. Exactly one upstream attempt is made.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
