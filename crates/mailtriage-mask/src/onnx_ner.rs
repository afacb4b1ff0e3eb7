//! ONNX-based full-name detection using a token-classification model.
//!
//! Loads a BERT-style NER model and tokenizer, tags each token, and
//! aggregates contiguous PER-tagged tokens into `full_name` candidate
//! spans using the tokenizer's offset map. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;
    use std::sync::Arc;

    use mailtriage_core::{Error, Result};
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::{info, warn};

    use crate::ner::NerBackend;
    use crate::types::{CandidateSpan, PiiLabel};

    /// Maximum sequence length for the model.
    const MAX_SEQ_LEN: usize = 512;

    /// Minimum trimmed length for a detected name to be kept.
    const MIN_NAME_LEN: usize = 2;

    /// ONNX token-classification backend emitting `full_name` spans.
    pub struct OnnxNer {
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        /// BIO tag names indexed by model output class, e.g. `B-PER`.
        labels: Vec<String>,
    }

    impl OnnxNer {
        /// Load an ONNX NER model and tokenizer from the given directory.
        ///
        /// Expects:
        /// - `model_dir/ner.onnx` — the token-classification model
        /// - `model_dir/tokenizer.json` — the HuggingFace tokenizer
        /// - `model_dir/ner_labels.json` — JSON array of BIO tag names
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("ner.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");
            let labels_path = model_dir.join("ner_labels.json");

            if !model_path.exists() {
                return Err(Error::Inference(format!(
                    "Model not found: {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Inference(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // Initialize ONNX Runtime environment.
            // With load-dynamic feature, ORT_DYLIB_PATH env var must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| Error::Inference(format!("Failed to create session builder: {}", e)))?
                .with_intra_threads(2)
                .map_err(|e| Error::Inference(format!("Failed to set threads: {}", e)))?
                .commit_from_file(&model_path)
                .map_err(|e| Error::Inference(format!("Failed to load ONNX model: {}", e)))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::Inference(format!("Failed to load tokenizer: {}", e)))?;

            let labels: Vec<String> = std::fs::read_to_string(&labels_path)
                .map_err(|e| Error::Config(format!("Failed to read labels: {}", e)))
                .and_then(|s| {
                    serde_json::from_str(&s)
                        .map_err(|e| Error::Config(format!("Failed to parse labels: {}", e)))
                })?;

            info!(
                "ONNX NER loaded: {} tags, model={}",
                labels.len(),
                model_path.display()
            );

            Ok(Self {
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                labels,
            })
        }

        /// Tag tokens and return per-token (offset, tag) pairs.
        fn infer(&self, text: &str) -> Option<Vec<((usize, usize), usize)>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| {
                    warn!("Tokenization failed: {}", e);
                    e
                })
                .ok()?;

            let input_ids = encoding.get_ids();
            let attention_mask = encoding.get_attention_mask();
            let offsets = encoding.get_offsets();
            let special = encoding.get_special_tokens_mask();

            let seq_len = input_ids.len().min(MAX_SEQ_LEN);
            let input_ids = &input_ids[..seq_len];
            let attention_mask = &attention_mask[..seq_len];

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(|e| warn!("Failed to create ids tensor: {}", e))
                .ok()?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(|e| warn!("Failed to create mask tensor: {}", e))
                .ok()?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
                .map_err(|e| warn!("Failed to create type_ids tensor: {}", e))
                .ok()?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(|e| {
                    warn!("ONNX NER inference failed: {}", e);
                    e
                })
                .ok()?;

            // Logits [1, seq_len, num_labels] → per-token argmax.
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| {
                    warn!("Failed to extract output tensor: {}", e);
                    e
                })
                .ok()?;

            let shape_dims: Vec<i64> = shape.iter().copied().collect();
            if shape_dims.len() != 3 {
                warn!("Unexpected NER output shape: {:?}", shape_dims);
                return None;
            }
            let num_labels = shape_dims[2] as usize;

            let mut tagged = Vec::with_capacity(seq_len);
            for i in 0..seq_len {
                if special.get(i).copied().unwrap_or(0) == 1 {
                    continue;
                }
                let logits = &data[i * num_labels..(i + 1) * num_labels];
                let tag = logits
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                tagged.push((offsets[i], tag));
            }
            Some(tagged)
        }

        fn is_person_tag(&self, tag: usize) -> bool {
            self.labels
                .get(tag)
                .map(|name| name.ends_with("PER"))
                .unwrap_or(false)
        }
    }

    impl NerBackend for OnnxNer {
        fn detect_names(&self, text: &str) -> Vec<CandidateSpan> {
            let Some(tagged) = self.infer(text) else {
                return Vec::new();
            };

            // Aggregate contiguous PER-tagged tokens into one span each.
            let mut spans = Vec::new();
            let mut current: Option<(usize, usize)> = None;

            for &((start, end), tag) in &tagged {
                if start == end {
                    continue;
                }
                if self.is_person_tag(tag) {
                    current = match current {
                        Some((s, _)) => Some((s, end)),
                        None => Some((start, end)),
                    };
                } else if let Some((s, e)) = current.take() {
                    push_span(text, s, e, &mut spans);
                }
            }
            if let Some((s, e)) = current {
                push_span(text, s, e, &mut spans);
            }

            spans
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn push_span(text: &str, start: usize, end: usize, spans: &mut Vec<CandidateSpan>) {
        let Some(slice) = text.get(start..end) else {
            warn!("NER span {}..{} not on char boundary, dropped", start, end);
            return;
        };
        if slice.trim().chars().count() < MIN_NAME_LEN {
            return;
        }
        spans.push(CandidateSpan {
            start,
            end,
            label: PiiLabel::FullName,
            text: slice.to_string(),
        });
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxNer;
