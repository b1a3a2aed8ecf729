/// End-to-end tests for the adapter pipeline.
///
/// The real ONNX model is not available under test; the primary path is
/// exercised with a stand-in provider and the degraded path with a
/// closure that always fails, the same way `main` wires the two together.
use embedpipe::adapter;
use embedpipe::provider::fallback::FallbackProvider;
use embedpipe::provider::{EmbeddingProvider, ProviderError};

fn unavailable(_: &[String]) -> Result<Vec<Vec<f64>>, ProviderError> {
    Err(ProviderError::ModelLoad("model not installed".into()))
}

fn run_degraded(input: &str) -> Vec<u8> {
    let mut out = Vec::new();
    adapter::run(input.as_bytes(), &mut out, unavailable).unwrap();
    out
}

/// `["hello", "world"]` with the provider forced unavailable: two
/// 384-element vectors in `[0, 1]`, six repeating 64-element blocks each.
#[test]
fn test_degraded_run_hello_world() {
    let out = run_degraded(r#"["hello", "world"]"#);

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with('\n'), "output must be newline-terminated");

    let vectors: Vec<Vec<f64>> = serde_json::from_str(&text).unwrap();
    assert_eq!(vectors.len(), 2, "one vector per input text");

    for v in &vectors {
        assert_eq!(v.len(), 384);
        assert!(v.iter().all(|x| (0.0..=1.0).contains(x)));
        for i in 0..320 {
            assert_eq!(v[i], v[i + 64], "periodicity broken at index {i}");
        }
    }
    assert_ne!(vectors[0], vectors[1]);
}

#[test]
fn test_degraded_run_is_deterministic() {
    let first = run_degraded(r#"["stable output"]"#);
    let second = run_degraded(r#"["stable output"]"#);
    assert_eq!(first, second);
}

#[test]
fn test_single_text_yields_single_vector() {
    let vectors: Vec<Vec<f64>> =
        serde_json::from_slice(&run_degraded(r#"["a"]"#)).unwrap();
    assert_eq!(vectors.len(), 1);
    assert_eq!(vectors[0].len(), 384);
}

#[test]
fn test_empty_input_yields_empty_output() {
    assert_eq!(run_degraded("[]"), b"[]\n");
}

#[test]
fn test_unicode_text() {
    let vectors: Vec<Vec<f64>> =
        serde_json::from_slice(&run_degraded(r#"["héllo wörld ♥"]"#)).unwrap();
    assert_eq!(vectors.len(), 1);
    assert_eq!(vectors[0].len(), 384);
}

/// Malformed input is a caller error: the run fails, it does not fall
/// back to empty or pseudo output.
#[test]
fn test_malformed_input_fails_visibly() {
    let mut out = Vec::new();
    assert!(adapter::run(&b"not json at all"[..], &mut out, unavailable).is_err());
    assert!(out.is_empty());
}

/// When the primary provider works, its vectors are emitted as-is and the
/// fallback is never consulted.
#[test]
fn test_primary_path_is_preferred() {
    let provider = FallbackProvider::new(8);

    let mut out = Vec::new();
    adapter::run(&br#"["alpha", "beta"]"#[..], &mut out, |texts| {
        provider.embed(texts)
    })
    .unwrap();

    let vectors: Vec<Vec<f64>> = serde_json::from_slice(&out).unwrap();
    assert_eq!(vectors.len(), 2);
    // 8-dim vectors pass through; nothing reconciles them against 384.
    assert_eq!(vectors[0], provider.vector("alpha"));
    assert_eq!(vectors[1], provider.vector("beta"));
}
