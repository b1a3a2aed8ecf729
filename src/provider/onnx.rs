//! Real embeddings via ONNX Runtime using the `ort` crate.
//!
//! Runs bge-small-en-v1.5: tokenize, forward pass, mean pooling over the
//! last hidden state weighted by the attention mask, L2 normalization.
//! Texts are processed one at a time.
use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use super::{EmbeddingProvider, ProviderError};

/// Hidden size of bge-small-en-v1.5.
const MODEL_DIMENSIONS: usize = 384;

/// Token budget of the model; longer texts are truncated.
const MAX_TOKENS: usize = 512;

/// ONNX-backed embedding provider.
pub struct OnnxProvider {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl OnnxProvider {
    /// Load the model from `model_dir`, which must contain `model.onnx`
    /// and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self, ProviderError> {
        let model_path = model_dir.join("model.onnx");
        if !model_path.exists() {
            return Err(ProviderError::ModelLoad(format!(
                "model.onnx not found in {}",
                model_dir.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ProviderError::ModelLoad(format!("session builder error: {e}")))?
            .commit_from_file(&model_path)
            .map_err(|e| ProviderError::ModelLoad(format!("model load error: {e}")))?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| ProviderError::Tokenizer(format!("failed to load tokenizer: {e}")))?;
        let _ = tokenizer.with_truncation(Some(tokenizers::TruncationParams {
            max_length: MAX_TOKENS,
            ..Default::default()
        }));

        info!("ONNX model loaded from {}", model_dir.display());

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Download the model files if missing, then load.
    ///
    /// Folding the fetch into construction keeps the whole primary path
    /// behind one `Result`.
    pub fn fetch_and_load(model_dir: &Path) -> Result<Self, ProviderError> {
        super::download::ensure_model_files(model_dir)
            .map_err(|e| ProviderError::ModelFetch(format!("{e:#}")))?;
        Self::load(model_dir)
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ProviderError::Tokenizer(format!("encoding failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| i64::from(m))
            .collect();
        let seq_len = input_ids.len();

        // (shape, data) tuple form avoids ndarray version coupling with ort
        let input_ids_val = Tensor::from_array(([1usize, seq_len], input_ids))
            .map_err(|e| ProviderError::Inference(format!("input_ids error: {e}")))?;
        let attention_mask_val = Tensor::from_array(([1usize, seq_len], attention_mask.clone()))
            .map_err(|e| ProviderError::Inference(format!("attention_mask error: {e}")))?;
        let token_type_ids_val = Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len]))
            .map_err(|e| ProviderError::Inference(format!("token_type_ids error: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ProviderError::Inference(format!("lock poisoned: {e}")))?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_val,
                "attention_mask" => attention_mask_val,
                "token_type_ids" => token_type_ids_val,
            ])
            .map_err(|e| ProviderError::Inference(format!("inference failed: {e}")))?;

        // Last hidden state, flat [1, seq_len, hidden]. The hidden size
        // comes from the output itself and is not validated against
        // MODEL_DIMENSIONS.
        let (_shape, hidden) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ProviderError::Inference(format!("output extraction: {e}")))?;

        if seq_len == 0 || hidden.len() % seq_len != 0 {
            return Err(ProviderError::Inference(format!(
                "unexpected output length {} for {seq_len} tokens",
                hidden.len()
            )));
        }
        let hidden_size = hidden.len() / seq_len;

        let pooled = mean_pool(hidden, &attention_mask, seq_len, hidden_size);
        Ok(l2_normalize(pooled))
    }
}

impl EmbeddingProvider for OnnxProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ProviderError> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn dimensions(&self) -> usize {
        MODEL_DIMENSIONS
    }
}

/// Mean over token positions, weighted by the attention mask, widened to
/// f64 on the way out.
fn mean_pool(
    hidden: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f64> {
    let mut pooled = vec![0.0f64; hidden_size];
    let mut mask_total = 0.0f64;

    for t in 0..seq_len {
        let mask = attention_mask[t] as f64;
        mask_total += mask;

        for (h, slot) in pooled.iter_mut().enumerate() {
            *slot += f64::from(hidden[t * hidden_size + h]) * mask;
        }
    }

    // Average by number of real tokens
    if mask_total > 0.0 {
        for slot in &mut pooled {
            *slot /= mask_total;
        }
    }
    pooled
}

fn l2_normalize(mut vector: Vec<f64>) -> Vec<f64> {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}
