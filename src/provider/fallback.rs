//! Deterministic pseudo-embeddings for when the real model is unavailable.
//!
//! The vectors carry no semantic meaning; they exist so downstream
//! consumers always receive one vector per text in degraded mode.
use super::{EmbeddingProvider, ProviderError};

/// Dimensionality of fallback vectors. Matches bge-small-en-v1.5 so a
/// degraded pipeline keeps the shape consumers expect; nothing enforces
/// the match.
pub const FALLBACK_DIMENSIONS: usize = 384;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over a byte slice.
///
/// Fixed and portable, so fallback vectors are identical across runs and
/// platforms, not just within one process.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Produces deterministic vectors derived from a hash of the text.
pub struct FallbackProvider {
    dimensions: usize,
}

impl FallbackProvider {
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// The fallback vector for one text: element `i` is an 8-bit slice of
    /// the hash, shifted by `i % 64` bits, normalized to `[0, 1]`. The
    /// shift amount cycles every 64 positions, so at the default 384
    /// dimensions the vector is six repetitions of a 64-element pattern.
    #[must_use]
    pub fn vector(&self, text: &str) -> Vec<f64> {
        let hash = fnv1a(text.as_bytes());
        (0..self.dimensions)
            .map(|i| ((hash >> (i % 64)) & 0xff) as f64 / 255.0)
            .collect()
    }
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self::new(FALLBACK_DIMENSIONS)
    }
}

impl EmbeddingProvider for FallbackProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ProviderError> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
