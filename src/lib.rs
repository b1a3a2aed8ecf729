//! # embedpipe — stdin/stdout text-embedding adapter
//!
//! Reads one JSON array of strings from stdin and writes one JSON array of
//! embedding vectors to stdout, one vector per text, same order. Vectors
//! come from a local ONNX model (bge-small-en-v1.5); if the model cannot
//! be fetched, loaded, or run, deterministic hash-derived vectors are
//! emitted instead, so well-formed input always yields output.
//!
//! ## Architecture
//!
//! - **[`adapter`]** — the parse → embed → serialize pipeline
//! - **[`provider`]** — embedding providers: ONNX primary, hash fallback,
//!   model auto-fetch

pub mod adapter;
pub mod provider;
