//! ONNX-based sequence classification for support categories.
//!
//! Loads a fine-tuned text-classification model, tokenizer, and label
//! list; inference produces logits over the categories which are
//! softmaxed into a probability map. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    use mailtriage_core::{Error, Result};
    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::{info, warn};

    use crate::classifier::{ClassifierBackend, Prediction};

    /// Maximum sequence length for the model.
    const MAX_SEQ_LEN: usize = 512;

    /// ONNX sequence-classification backend.
    pub struct OnnxClassifier {
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        categories: Vec<String>,
    }

    impl OnnxClassifier {
        /// Load an ONNX classifier from the given directory.
        ///
        /// Expects:
        /// - `model_dir/classifier.onnx` — the sequence-classification model
        /// - `model_dir/tokenizer.json` — the HuggingFace tokenizer
        /// - `model_dir/categories.json` — JSON array of category names,
        ///   indexed by model output class
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("classifier.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");
            let categories_path = model_dir.join("categories.json");

            if !model_path.exists() {
                return Err(Error::Classification(format!(
                    "Model not found: {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Classification(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // Initialize ONNX Runtime environment.
            // With load-dynamic feature, ORT_DYLIB_PATH env var must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| {
                    Error::Classification(format!("Failed to create session builder: {}", e))
                })?
                .with_intra_threads(2)
                .map_err(|e| Error::Classification(format!("Failed to set threads: {}", e)))?
                .commit_from_file(&model_path)
                .map_err(|e| Error::Classification(format!("Failed to load ONNX model: {}", e)))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::Classification(format!("Failed to load tokenizer: {}", e)))?;

            let categories: Vec<String> = std::fs::read_to_string(&categories_path)
                .map_err(|e| Error::Config(format!("Failed to read categories: {}", e)))
                .and_then(|s| {
                    serde_json::from_str(&s)
                        .map_err(|e| Error::Config(format!("Failed to parse categories: {}", e)))
                })?;
            if categories.is_empty() {
                return Err(Error::Config("Empty category list".to_string()));
            }

            info!(
                "ONNX classifier loaded: {} categories, model={}",
                categories.len(),
                model_path.display()
            );

            Ok(Self {
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                categories,
            })
        }

        pub fn categories(&self) -> &[String] {
            &self.categories
        }

        /// Run inference, returning raw logits over the categories.
        fn infer(&self, text: &str) -> Option<Array1<f32>> {
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
                    warn!("ONNX classification failed: {}", e);
                    e
                })
                .ok()?;

            // Logits [1, num_categories]
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| {
                    warn!("Failed to extract output tensor: {}", e);
                    e
                })
                .ok()?;

            let shape_dims: Vec<i64> = shape.iter().copied().collect();
            if shape_dims.len() != 2 || shape_dims[1] as usize != self.categories.len() {
                warn!("Unexpected classifier output shape: {:?}", shape_dims);
                return None;
            }

            Some(Array1::from_vec(data[..self.categories.len()].to_vec()))
        }
    }

    /// Numerically stable softmax.
    fn softmax(logits: &Array1<f32>) -> Array1<f32> {
        let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exp: Array1<f32> = logits.mapv(|v| (v - max).exp());
        let sum = exp.sum();
        exp / sum
    }

    impl ClassifierBackend for OnnxClassifier {
        fn predict(&self, text: &str) -> Option<Prediction> {
            let logits = self.infer(text)?;
            let probs = softmax(&logits);

            let (best_idx, _) = probs
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))?;

            let probabilities: HashMap<String, f32> = self
                .categories
                .iter()
                .zip(probs.iter())
                .map(|(cat, p)| (cat.clone(), *p))
                .collect();

            Some(Prediction {
                category: self.categories[best_idx].clone(),
                probabilities,
            })
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "onnx"
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxClassifier;
