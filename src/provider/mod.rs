//! Embedding providers: the capability boundary between the adapter and
//! whatever actually turns text into vectors.
pub mod download;
pub mod fallback;
pub mod onnx;

use thiserror::Error;

/// Errors raised while obtaining real embeddings.
///
/// Callers recover from every variant the same way (switch to fallback
/// vectors), so the distinctions exist for logs, not for control flow.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("model download failed: {0}")]
    ModelFetch(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// A capability that maps a sequence of texts to a sequence of vectors.
///
/// Implementations must preserve order and return exactly one vector per
/// input text. All implementations are `Send + Sync` so they can be
/// shared behind `Arc` if a caller needs to.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed all `texts`, in order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ProviderError>;

    /// Dimensionality of the vectors this provider emits.
    fn dimensions(&self) -> usize;
}
