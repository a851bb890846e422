use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use tokenizers::{EncodeInput, Tokenizer};

use super::{ModelMeta, fetch_repo, load_tokenizer, softmax};
use crate::error::ModelError;

/// DistilBERT encoder with the two-layer sequence-classification head used
/// by SST-2 and MNLI fine-tunes: `pre_classifier` + ReLU + `classifier`
/// over the CLS position.
pub(crate) struct SequenceClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl SequenceClassifier {
    pub(crate) fn load(repo_id: &str, device: &Device) -> Result<Self, ModelError> {
        let files = fetch_repo(repo_id)?;
        let raw_config = std::fs::read_to_string(&files.config)
            .map_err(|e| ModelError::ModelLoad(format!("failed to read config.json: {e}")))?;
        let config: DistilBertConfig = serde_json::from_str(&raw_config)?;
        let meta = ModelMeta::parse(&raw_config)?;
        let labels = meta.labels()?;
        if labels.is_empty() {
            return Err(ModelError::ModelLoad(format!(
                "{repo_id} declares no labels"
            )));
        }

        let tokenizer = load_tokenizer(&files.tokenizer)?;

        // SAFETY: fresh safetensors from the hf-hub cache, not modified
        // during the VarBuilder lifetime
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[files.weights], DType::F32, device)? };

        // Checkpoint exports differ on whether encoder tensors carry the
        // "distilbert." prefix.
        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .or_else(|_| DistilBertModel::load(vb.clone(), &config))?;
        let pre_classifier =
            candle_nn::linear(meta.hidden_size, meta.hidden_size, vb.pp("pre_classifier"))?;
        let classifier = candle_nn::linear(meta.hidden_size, labels.len(), vb.pp("classifier"))?;

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            labels,
            device: device.clone(),
        })
    }

    pub(crate) fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Raw class logits for a single or paired input, in label-index order.
    pub(crate) fn logits<'s, E>(&self, input: E) -> Result<Vec<f32>, ModelError>
    where
        E: Into<EncodeInput<'s>>,
    {
        let encoding = self
            .tokenizer
            .encode(input, true)
            .map_err(|e| ModelError::Inference(format!("tokenizer encode failed: {e}")))?;

        let token_ids = encoding.get_ids();
        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        // All-zero mask: full bidirectional attention over the sequence.
        let mask = Tensor::zeros((token_ids.len(), token_ids.len()), DType::U8, &self.device)?;

        let hidden = self.model.forward(&input_ids, &mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        let logits = self.classifier.forward(&pooled)?.squeeze(0)?;
        logits.to_vec1::<f32>().map_err(ModelError::Candle)
    }

    /// Class probabilities (softmaxed logits), in label-index order.
    pub(crate) fn probabilities<'s, E>(&self, input: E) -> Result<Vec<f32>, ModelError>
    where
        E: Into<EncodeInput<'s>>,
    {
        Ok(softmax(&self.logits(input)?))
    }
}

impl std::fmt::Debug for SequenceClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceClassifier")
            .field("labels", &self.labels)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}
