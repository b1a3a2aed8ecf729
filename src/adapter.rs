//! The stdin → embeddings → stdout pipeline.
//!
//! One shot: decode a JSON array of strings, embed every string through
//! the primary provider, serialize the vectors as a JSON array of arrays.
//! When the primary path fails anywhere (model fetch, load, inference),
//! every text gets a deterministic fallback vector instead, so well-formed
//! input always produces output.
use std::io::{Read, Write};

use thiserror::Error;
use tracing::warn;

use crate::provider::ProviderError;
use crate::provider::fallback::FallbackProvider;

/// Errors that terminate an adapter run.
///
/// Provider failures are not represented here: they are absorbed by the
/// fallback path and never escape [`run`].
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The input did not decode as a JSON array of strings. Fatal: the
    /// caller's contract is exactly one JSON array of strings.
    #[error("input is not a JSON array of strings: {0}")]
    Input(#[source] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Read one JSON array of strings from `input` and write one JSON array
/// of embedding vectors to `output`, newline-terminated.
///
/// `primary` covers the entire real-embedding path, provider construction
/// included, as a single fallible operation; any error from it switches
/// the whole batch to fallback vectors. The two paths are never mixed
/// within one run.
pub fn run<R, W, F>(input: R, output: W, primary: F) -> Result<(), AdapterError>
where
    R: Read,
    W: Write,
    F: FnOnce(&[String]) -> Result<Vec<Vec<f64>>, ProviderError>,
{
    let texts: Vec<String> = serde_json::from_reader(input).map_err(AdapterError::Input)?;
    let vectors = embed_or_fallback(&texts, primary);
    write_vectors(output, &vectors)
}

/// Embed `texts` through `primary`, or derive fallback vectors for all of
/// them if it fails.
///
/// The primary provider is trusted to return one vector per text in input
/// order; that is not re-verified here.
pub fn embed_or_fallback<F>(texts: &[String], primary: F) -> Vec<Vec<f64>>
where
    F: FnOnce(&[String]) -> Result<Vec<Vec<f64>>, ProviderError>,
{
    match primary(texts) {
        Ok(vectors) => vectors,
        Err(err) => {
            warn!("embedding provider unavailable ({err}), emitting fallback vectors");
            let fallback = FallbackProvider::default();
            texts.iter().map(|t| fallback.vector(t)).collect()
        }
    }
}

fn write_vectors<W: Write>(mut output: W, vectors: &[Vec<f64>]) -> Result<(), AdapterError> {
    serde_json::to_writer(&mut output, vectors).map_err(|e| AdapterError::Output(e.into()))?;
    output.write_all(b"\n").map_err(AdapterError::Output)?;
    Ok(())
}
