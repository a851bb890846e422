//! candle-transformers backends for the three capability providers.

pub mod ner;
pub mod sentiment;
pub mod zero_shot;

mod distilbert;

pub use candle_core::Device;
pub use ner::NerTagger;
pub use sentiment::SentimentClassifier;
pub use zero_shot::ZeroShotClassifier;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokenizers::Tokenizer;

use crate::error::ModelError;

/// Token window shared by the supported checkpoints; over-long inputs are
/// truncated by the tokenizer rather than rejected.
pub(crate) const MODEL_MAX_TOKENS: usize = 512;

/// Select the compute device from a preference string
/// (`cpu` / `cuda` / `auto`).
///
/// # Errors
///
/// Returns an error if an explicitly requested device is unavailable.
pub fn select_device(preference: &str) -> Result<Device, ModelError> {
    match preference {
        "cuda" => {
            #[cfg(feature = "cuda")]
            return Ok(Device::new_cuda(0)?);
            #[cfg(not(feature = "cuda"))]
            Err(ModelError::ModelLoad(
                "compiled without the cuda feature".into(),
            ))
        }
        "auto" => {
            #[cfg(feature = "cuda")]
            if let Ok(device) = Device::new_cuda(0) {
                return Ok(device);
            }
            Ok(Device::Cpu)
        }
        _ => Ok(Device::Cpu),
    }
}

pub(crate) struct RepoFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Resolve a checkpoint's files through the hf-hub cache, downloading on
/// first use.
pub(crate) fn fetch_repo(repo_id: &str) -> Result<RepoFiles, ModelError> {
    let api = hf_hub::api::sync::Api::new().map_err(|e| {
        ModelError::ModelLoad(format!("failed to create HuggingFace API client: {e}"))
    })?;
    let repo = api.model(repo_id.to_owned());
    let get = |file: &str| {
        repo.get(file)
            .map_err(|e| ModelError::ModelLoad(format!("failed to download {file} from {repo_id}: {e}")))
    };
    Ok(RepoFiles {
        config: get("config.json")?,
        tokenizer: get("tokenizer.json")?,
        weights: get("model.safetensors")?,
    })
}

pub(crate) fn load_tokenizer(path: &Path) -> Result<Tokenizer, ModelError> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
        ModelError::ModelLoad(format!("failed to load tokenizer from {}: {e}", path.display()))
    })?;
    tokenizer
        .with_truncation(Some(tokenizers::TruncationParams {
            max_length: MODEL_MAX_TOKENS,
            ..Default::default()
        }))
        .map_err(|e| ModelError::ModelLoad(format!("tokenizer truncation setup failed: {e}")))?;
    Ok(tokenizer)
}

/// Classifier head metadata parsed from a checkpoint's `config.json`.
///
/// Read alongside the architecture config so the head dimensions and label
/// vocabulary always come from the checkpoint itself.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ModelMeta {
    #[serde(alias = "dim")]
    pub hidden_size: usize,
    id2label: HashMap<String, String>,
}

impl ModelMeta {
    pub(crate) fn parse(raw: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Labels in index order, as declared by `id2label`.
    pub(crate) fn labels(&self) -> Result<Vec<String>, ModelError> {
        let mut labels = vec![String::new(); self.id2label.len()];
        for (idx, label) in &self.id2label {
            let i: usize = idx.parse().map_err(|_| {
                ModelError::ModelLoad(format!("non-numeric id2label key: {idx}"))
            })?;
            if i >= labels.len() {
                return Err(ModelError::ModelLoad(format!(
                    "id2label key out of range: {i}"
                )));
            }
            labels[i] = label.clone();
        }
        Ok(labels)
    }
}

/// Numerically stable softmax over a logit slice.
pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

pub(crate) fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (idx, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((idx, value)),
        })
}
