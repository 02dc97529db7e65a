//! Thyroid cancer recurrence prediction
//!
//! Encodes a patient's clinical attributes into the feature layout the
//! classifier was trained on and serves Yes/No recurrence predictions over HTTP.

pub mod features;
pub mod model;
pub mod predict;
pub mod web;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Backend used for inference
pub type InferenceBackend = burn::backend::NdArray<f32>;

/// Predicted recurrence label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    Yes,
    No,
}

impl Recurrence {
    /// Map a classifier class to a label. Only class 1 means recurrence.
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Recurrence::Yes
        } else {
            Recurrence::No
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Yes => write!(f, "Yes"),
            Recurrence::No => write!(f, "No"),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ThyroidError {
    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Failed to load model from {path}: {message}")]
    ModelLoad { path: String, message: String },

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ThyroidError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Artifact path without extension (burn appends .mpk)
    pub path: String,
    pub hidden_dims: Vec<usize>,
    pub threshold: f32,
}

impl ModelConfig {
    /// Path of the artifact file on disk
    pub fn artifact_file(&self) -> String {
        format!("{}.mpk", self.path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                bind: "0.0.0.0:5000".to_string(),
                static_dir: "static".to_string(),
            },
            model: ModelConfig {
                path: "model/thyroid".to_string(),
                hidden_dims: vec![64, 32],
                threshold: 0.5,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ThyroidError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ThyroidError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ThyroidError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.model.threshold) {
            return Err(ThyroidError::Config(format!(
                "model.threshold must be within [0, 1], got {}",
                self.model.threshold
            )));
        }
        if self.model.hidden_dims.iter().any(|&d| d == 0) {
            return Err(ThyroidError::Config(
                "model.hidden_dims must not contain zero-width layers".to_string(),
            ));
        }
        Ok(())
    }
}
