//! Model file auto-fetch from HuggingFace.
//!
//! The model is not vendored; the first run fetches it into the per-user
//! cache directory. Files already present are never re-downloaded.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Base URL for the model files.
const HF_BASE: &str = "https://huggingface.co/BAAI/bge-small-en-v1.5/resolve/main";

/// Model name, also the cache subdirectory.
const MODEL_NAME: &str = "bge-small-en-v1.5";

/// Files the ONNX provider needs, with their URL paths on the hub.
const MODEL_FILES: &[(&str, &str)] = &[
    ("model.onnx", "onnx/model.onnx"),
    ("tokenizer.json", "tokenizer.json"),
];

/// Per-user cache location for the model files.
#[must_use]
pub fn default_model_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("embedpipe")
        .join(MODEL_NAME)
}

/// Check whether every required model file exists in `model_dir`.
#[must_use]
pub fn model_files_present(model_dir: &Path) -> bool {
    MODEL_FILES
        .iter()
        .all(|(name, _)| model_dir.join(name).exists())
}

/// Download any missing model files into `model_dir`.
pub fn ensure_model_files(model_dir: &Path) -> Result<()> {
    if model_files_present(model_dir) {
        return Ok(());
    }

    fs::create_dir_all(model_dir)
        .with_context(|| format!("failed to create model directory {}", model_dir.display()))?;

    info!("fetching {MODEL_NAME} into {}", model_dir.display());

    for &(filename, url_path) in MODEL_FILES {
        let dest = model_dir.join(filename);
        if dest.exists() {
            continue;
        }

        let url = format!("{HF_BASE}/{url_path}");
        eprintln!("[INFO] Downloading {filename}...");
        download_file(&dest, &url).with_context(|| format!("failed to download {filename}"))?;
    }

    Ok(())
}

/// Stream one file to disk with a progress bar on stderr.
fn download_file(dest: &Path, url: &str) -> Result<()> {
    let resp =
        reqwest::blocking::get(url).with_context(|| format!("HTTP request failed: {url}"))?;

    if !resp.status().is_success() {
        anyhow::bail!("bad status: {} for {url}", resp.status());
    }

    let bar = match resp.content_length() {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {percent}% ({bytes}/{total_bytes})")
                    .expect("valid template")
                    .progress_chars("█▓░"),
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    };

    let mut reader = bar.wrap_read(resp);
    let mut file =
        fs::File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    io::copy(&mut reader, &mut file).context("failed to stream response body")?;
    bar.finish_and_clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_files_present_empty_dir() {
        let dir = tempdir().unwrap();
        assert!(!model_files_present(dir.path()));
    }

    #[test]
    fn test_files_present_complete() {
        let dir = tempdir().unwrap();
        for (name, _) in MODEL_FILES {
            fs::write(dir.path().join(name), "stub").unwrap();
        }
        assert!(model_files_present(dir.path()));
    }

    #[test]
    fn test_ensure_skips_when_complete() {
        // Must not touch the network when every file is already there.
        let dir = tempdir().unwrap();
        for (name, _) in MODEL_FILES {
            fs::write(dir.path().join(name), "stub").unwrap();
        }
        ensure_model_files(dir.path()).unwrap();
    }

    #[test]
    fn test_default_model_dir_is_namespaced() {
        let dir = default_model_dir();
        assert!(dir.ends_with(Path::new("embedpipe").join(MODEL_NAME)));
    }
}
