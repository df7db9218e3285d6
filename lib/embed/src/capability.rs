use std::sync::Arc;
use talentmatch_core::Result;

/// A text embedding backend.
///
/// Implementations must be deterministic for identical input and always
/// return `dimensions()` values. Backend failures are reported as
/// `Error::EmbeddingCapability` and are passed through untouched.
pub trait EmbeddingCapability: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;
}

impl<T: EmbeddingCapability + ?Sized> EmbeddingCapability for Arc<T> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<T: EmbeddingCapability + ?Sized> EmbeddingCapability for Box<T> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
