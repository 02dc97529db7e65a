//! Classifier seam used by the request path

use std::path::Path;
use std::sync::{Arc, Mutex};

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::net::{RecurrenceNet, RecurrenceNetConfig};
use crate::features::FeatureVector;
use crate::{InferenceBackend, ModelConfig, Result, ThyroidError};

/// A pre-trained binary classifier
pub trait Classifier: Send + Sync {
    /// Class for one encoded patient: 1 means recurrence, 0 none
    fn predict(&self, features: &FeatureVector) -> Result<u8>;
}

/// Shared, read-only classifier handle. `None` when the artifact failed to load.
pub type SharedClassifier = Option<Arc<dyn Classifier>>;

/// Classifier backed by a [`RecurrenceNet`]
pub struct NetworkClassifier {
    // burn modules are Send but not Sync; the lock only serializes forward passes
    model: Mutex<RecurrenceNet<InferenceBackend>>,
    device: <InferenceBackend as Backend>::Device,
    threshold: f32,
}

impl NetworkClassifier {
    pub fn new(
        model: RecurrenceNet<InferenceBackend>,
        device: <InferenceBackend as Backend>::Device,
        threshold: f32,
    ) -> Self {
        NetworkClassifier {
            model: Mutex::new(model),
            device,
            threshold,
        }
    }

    /// Load the artifact named by the model config
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let artifact = config.artifact_file();
        if !Path::new(&artifact).exists() {
            return Err(ThyroidError::ModelLoad {
                path: artifact,
                message: "artifact not found".to_string(),
            });
        }

        let device = Default::default();
        let net_config = RecurrenceNetConfig::from_model_config(config);
        let model = RecurrenceNet::load(&device, &config.path, &net_config)?;
        Ok(Self::new(model, device, config.threshold))
    }

    /// P(recurrence) for one encoded patient
    pub fn probability(&self, features: &FeatureVector) -> Result<f32> {
        let input = Tensor::<InferenceBackend, 1>::from_floats(
            features.to_f32().as_slice(),
            &self.device,
        )
        .reshape([1, FeatureVector::DIM]);

        let probs = {
            let model = self
                .model
                .lock()
                .map_err(|_| ThyroidError::Prediction("classifier lock poisoned".to_string()))?;
            model.probability(input)
        };

        let data = probs.into_data();
        let p = data
            .as_slice::<f32>()
            .map_err(|e| ThyroidError::Prediction(format!("{:?}", e)))?
            .first()
            .copied()
            .ok_or_else(|| ThyroidError::Prediction("classifier produced no output".to_string()))?;

        if !p.is_finite() {
            return Err(ThyroidError::Prediction(format!(
                "classifier produced a non-finite probability ({})",
                p
            )));
        }
        Ok(p)
    }
}

impl Classifier for NetworkClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        let p = self.probability(features)?;
        log::debug!("P(recurrence) = {:.4} (threshold {})", p, self.threshold);
        Ok(u8::from(p >= self.threshold))
    }
}

/// Load the configured classifier once at startup.
///
/// A missing or corrupt artifact is logged and yields `None`; callers keep
/// running and report the model as unavailable.
pub fn load_classifier(config: &ModelConfig) -> SharedClassifier {
    match NetworkClassifier::load(config) {
        Ok(classifier) => {
            log::info!("Loaded model from {}", config.artifact_file());
            Some(Arc::new(classifier))
        }
        Err(e) => {
            log::warn!("Error loading model: {}", e);
            None
        }
    }
}
