//! Feed-forward recurrence classifier
//!
//! Architecture: Input(38) → [Linear → ReLU] per hidden layer → Linear(1) logit

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::FEATURE_DIM;
use crate::{ModelConfig, Result, ThyroidError};

/// Configuration for the recurrence network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceNetConfig {
    /// Input dimension (encoded patient features)
    pub input_dim: usize,
    /// Hidden layer dimensions (e.g., [64, 32] for two layers)
    pub hidden_dims: Vec<usize>,
}

impl Default for RecurrenceNetConfig {
    fn default() -> Self {
        RecurrenceNetConfig {
            input_dim: FEATURE_DIM,
            hidden_dims: vec![64, 32],
        }
    }
}

impl RecurrenceNetConfig {
    pub fn from_model_config(config: &ModelConfig) -> Self {
        RecurrenceNetConfig {
            input_dim: FEATURE_DIM,
            hidden_dims: config.hidden_dims.clone(),
        }
    }

    /// Expected (input, output) shape of every linear layer, head last
    fn layer_shapes(&self) -> Vec<[usize; 2]> {
        let mut shapes = Vec::with_capacity(self.hidden_dims.len() + 1);
        let mut in_dim = self.input_dim;
        for &out_dim in &self.hidden_dims {
            shapes.push([in_dim, out_dim]);
            in_dim = out_dim;
        }
        shapes.push([in_dim, 1]);
        shapes
    }
}

/// A single hidden layer block: Linear → ReLU
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        relu(self.linear.forward(x))
    }
}

/// Binary classifier over encoded patients
#[derive(Module, Debug)]
pub struct RecurrenceNet<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    head: Linear<B>,
}

impl<B: Backend> RecurrenceNet<B> {
    pub fn new(device: &B::Device, config: &RecurrenceNetConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = config.input_dim;
        for &out_dim in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, out_dim));
            in_dim = out_dim;
        }

        RecurrenceNet {
            hidden,
            head: LinearConfig::new(in_dim, 1).init(device),
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `features` - Encoded patients [batch, input_dim]
    ///
    /// # Returns
    /// Recurrence logits [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(features, |x, block| block.forward(x));
        self.head.forward(x)
    }

    /// P(recurrence) [batch, 1]
    pub fn probability(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward(features))
    }

    /// Check loaded weights against the expected architecture
    pub fn validate(&self, config: &RecurrenceNetConfig) -> Result<()> {
        let expected = config.layer_shapes();
        let actual: Vec<[usize; 2]> = self
            .hidden
            .iter()
            .map(|block| block.linear.weight.val().dims())
            .chain(std::iter::once(self.head.weight.val().dims()))
            .collect();

        if actual != expected {
            return Err(ThyroidError::Parse(format!(
                "layer shapes {:?} do not match configured architecture {:?}",
                actual, expected
            )));
        }
        Ok(())
    }

    /// Save model to file (burn appends .mpk)
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| ThyroidError::Io(std::io::Error::other(e.to_string())))
    }

    /// Load model from file and verify it matches `config`
    pub fn load(device: &B::Device, path: &str, config: &RecurrenceNetConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let load_error = |message: String| ThyroidError::ModelLoad {
            path: path.to_string(),
            message,
        };

        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| load_error(e.to_string()))?;

        let model = Self::new(device, config).load_record(record);
        model
            .validate(config)
            .map_err(|e| load_error(e.to_string()))?;
        Ok(model)
    }
}
