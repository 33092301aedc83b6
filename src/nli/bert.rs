use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::xlm_roberta::{Config as RobertaConfig, XLMRobertaModel};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::constants::NLI_CLASSES;

/// Only the label table is needed on top of the encoder config.
#[derive(Deserialize)]
struct LabelConfig {
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
}

enum ClassificationHead {
    /// RoBERTa layout: `classifier.dense` → tanh → `classifier.out_proj` on the `<s>` token.
    Projected { dense: Linear, out_proj: Linear },
    /// BERT layout: optional `pooler.dense` → tanh → `classifier` on the `[CLS]` token.
    Pooled {
        pooler: Option<Linear>,
        classifier: Linear,
    },
}

impl ClassificationHead {
    fn forward(&self, cls_token: &Tensor) -> Result<Tensor> {
        match self {
            ClassificationHead::Projected { dense, out_proj } => {
                let hidden = dense.forward(cls_token)?.tanh()?;
                out_proj.forward(&hidden)
            }
            ClassificationHead::Pooled { pooler, classifier } => {
                let pooled = match pooler {
                    Some(pooler) => pooler.forward(cls_token)?.tanh()?,
                    None => cls_token.clone(),
                };
                classifier.forward(&pooled)
            }
        }
    }
}

/// Encoder families the classifier can run, read from `model_type` in `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    Bert,
    /// Position ids start after the padding index.
    Roberta,
}

impl EncoderKind {
    pub fn from_model_type(model_type: &str) -> Result<Self> {
        match model_type {
            "bert" => Ok(EncoderKind::Bert),
            "roberta" | "xlm-roberta" => Ok(EncoderKind::Roberta),
            other => Err(candle::Error::Msg(format!(
                "unsupported model_type `{other}`, expected bert or roberta"
            ))),
        }
    }

    /// Reads `model_type` from a parsed `config.json`; a missing field means BERT.
    pub fn from_config(config: &serde_json::Value) -> Result<Self> {
        let model_type = config
            .get("model_type")
            .and_then(|v| v.as_str())
            .unwrap_or("bert");
        Self::from_model_type(model_type)
    }

    fn prefix(self) -> &'static str {
        match self {
            EncoderKind::Bert => "bert",
            EncoderKind::Roberta => "roberta",
        }
    }
}

enum Encoder {
    Bert(BertModel),
    Roberta(XLMRobertaModel),
}

impl Encoder {
    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        match self {
            Encoder::Bert(model) => model.forward(input_ids, token_type_ids, Some(attention_mask)),
            Encoder::Roberta(model) => {
                model.forward(input_ids, attention_mask, token_type_ids, None, None, None)
            }
        }
    }
}

struct SequenceClassifierImpl {
    encoder: Encoder,
    head: ClassificationHead,
}

impl SequenceClassifierImpl {
    fn load(
        vb: VarBuilder,
        kind: EncoderKind,
        mut config: serde_json::Value,
        num_labels: usize,
    ) -> Result<Self> {
        let prefix = kind.prefix();
        let encoder_vb = if vb.contains_tensor(&format!("{prefix}.embeddings.word_embeddings.weight"))
        {
            vb.pp(prefix)
        } else {
            vb.clone()
        };

        let (encoder, hidden_size) = match kind {
            EncoderKind::Bert => {
                let config: BertConfig = serde_json::from_value(config)
                    .map_err(|e| candle::Error::Msg(format!("Invalid BERT config: {e}")))?;
                (
                    Encoder::Bert(BertModel::load(encoder_vb.clone(), &config)?),
                    config.hidden_size,
                )
            }
            EncoderKind::Roberta => {
                // Older RoBERTa configs omit this field.
                if let Some(fields) = config.as_object_mut() {
                    fields
                        .entry("position_embedding_type")
                        .or_insert_with(|| "absolute".into());
                }
                let config: RobertaConfig = serde_json::from_value(config)
                    .map_err(|e| candle::Error::Msg(format!("Invalid RoBERTa config: {e}")))?;
                (
                    Encoder::Roberta(XLMRobertaModel::new(&config, encoder_vb.clone())?),
                    config.hidden_size,
                )
            }
        };

        let head = if vb.contains_tensor("classifier.out_proj.weight") {
            ClassificationHead::Projected {
                dense: candle_nn::linear(hidden_size, hidden_size, vb.pp("classifier.dense"))?,
                out_proj: candle_nn::linear(hidden_size, num_labels, vb.pp("classifier.out_proj"))?,
            }
        } else {
            let pooler_vb = encoder_vb.pp("pooler.dense");
            let pooler = if pooler_vb.contains_tensor("weight") {
                Some(candle_nn::linear(hidden_size, hidden_size, pooler_vb)?)
            } else {
                None
            };
            ClassificationHead::Pooled {
                pooler,
                classifier: candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))?,
            }
        };

        Ok(Self { encoder, head })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let output = self
            .encoder
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.head.forward(&cls_token)
    }
}

/// Three-way sequence classifier over a BERT or RoBERTa encoder.
#[derive(Clone)]
pub struct NliClassifier(std::sync::Arc<SequenceClassifierImpl>);

impl NliClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: serde_json::Value = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        let kind = EncoderKind::from_config(&config)?;
        let labels: LabelConfig = serde_json::from_value(config.clone())
            .map_err(|e| candle::Error::Msg(format!("Failed to parse label table: {}", e)))?;

        let num_labels = labels.id2label.map_or(NLI_CLASSES, |m| m.len());
        if num_labels != NLI_CLASSES {
            return Err(candle::Error::Msg(format!(
                "expected a {NLI_CLASSES}-way NLI head, config declares {num_labels} labels"
            )));
        }

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = SequenceClassifierImpl::load(vb, kind, config, num_labels)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Returns raw logits of shape `(batch, 3)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}
