use candle_core::{D, DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use super::{ModelMeta, fetch_repo, load_tokenizer};
use crate::error::ModelError;
use crate::provider::{EntityLabel, EntityModel, EntitySpan};

/// BERT token classifier with BIO tag decoding.
pub struct NerTagger {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl NerTagger {
    /// Load a BERT token-classification checkpoint from `HuggingFace` Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if download, weight loading, or tokenizer
    /// initialization fails.
    pub fn load(repo_id: &str, device: &Device) -> Result<Self, ModelError> {
        let files = fetch_repo(repo_id)?;
        let raw_config = std::fs::read_to_string(&files.config)
            .map_err(|e| ModelError::ModelLoad(format!("failed to read config.json: {e}")))?;
        let config: BertConfig = serde_json::from_str(&raw_config)?;
        let meta = ModelMeta::parse(&raw_config)?;
        let labels = meta.labels()?;

        let tokenizer = load_tokenizer(&files.tokenizer)?;

        // SAFETY: fresh safetensors from the hf-hub cache, not modified
        // during the VarBuilder lifetime
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[files.weights], DType::F32, device)? };

        // Checkpoint exports differ on whether encoder tensors carry the
        // "bert." prefix.
        let model = BertModel::load(vb.pp("bert"), &config)
            .or_else(|_| BertModel::load(vb.clone(), &config))?;
        let classifier = candle_nn::linear(meta.hidden_size, labels.len(), vb.pp("classifier"))?;

        tracing::info!(repo = repo_id, tags = labels.len(), "NER model loaded");

        Ok(Self {
            model,
            classifier,
            tokenizer,
            labels,
            device: device.clone(),
        })
    }
}

impl EntityModel for NerTagger {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, ModelError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ModelError::Inference(format!("tokenizer encode failed: {e}")))?;

        let token_ids = encoding.get_ids();
        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self.model.forward(&input_ids, &token_type_ids, None)?;
        let logits = self.classifier.forward(&hidden)?;
        let tags = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1::<u32>()?;

        let offsets = encoding.get_offsets();
        let special = encoding.get_special_tokens_mask();
        let mut tagged = Vec::with_capacity(tags.len());
        for (idx, tag_id) in tags.iter().enumerate() {
            if special.get(idx).copied().unwrap_or(0) == 1 {
                continue;
            }
            let Some(&(start, end)) = offsets.get(idx) else {
                continue;
            };
            if start == end {
                continue;
            }
            let Some(tag) = self.labels.get(*tag_id as usize) else {
                continue;
            };
            tagged.push(TokenTag { tag, start, end });
        }

        Ok(decode_spans(text, &tagged))
    }
}

impl std::fmt::Debug for NerTagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NerTagger")
            .field("labels", &self.labels)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// One model tag anchored to its byte range in the source text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TokenTag<'a> {
    pub tag: &'a str,
    pub start: usize,
    pub end: usize,
}

fn split_tag(tag: &str) -> Option<(&str, &str)> {
    tag.split_once('-')
        .filter(|(prefix, _)| matches!(*prefix, "B" | "I"))
}

/// Group BIO-tagged tokens into labeled spans, slicing each span's text
/// verbatim from the source. A lone `I-` tag opens a new span; a family
/// change closes the current one.
pub(crate) fn decode_spans(text: &str, tokens: &[TokenTag<'_>]) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut current: Option<(&str, usize, usize)> = None;

    for token in tokens {
        match split_tag(token.tag) {
            Some((prefix, family)) => {
                let continues =
                    prefix == "I" && current.is_some_and(|(cur, _, _)| cur == family);
                if continues {
                    if let Some(span) = current.as_mut() {
                        span.2 = token.end;
                    }
                } else {
                    flush(text, current.take(), &mut spans);
                    current = Some((family, token.start, token.end));
                }
            }
            None => flush(text, current.take(), &mut spans),
        }
    }
    flush(text, current, &mut spans);
    spans
}

fn flush(text: &str, span: Option<(&str, usize, usize)>, out: &mut Vec<EntitySpan>) {
    let Some((family, start, end)) = span else {
        return;
    };
    let Some(slice) = text.get(start..end) else {
        return;
    };
    out.push(EntitySpan {
        text: slice.to_owned(),
        label: EntityLabel::from_tag_family(family),
    });
}
