use std::io;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use embedpipe::adapter;
use embedpipe::provider::EmbeddingProvider;
use embedpipe::provider::download::default_model_dir;
use embedpipe::provider::onnx::OnnxProvider;

fn main() -> Result<()> {
    // Logs go to stderr: stdout carries exactly one JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    adapter::run(stdin, stdout, |texts| {
        let provider = OnnxProvider::fetch_and_load(&default_model_dir())?;
        provider.embed(texts)
    })?;

    Ok(())
}
