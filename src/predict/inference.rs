//! Recurrence inference for a single patient

use std::fmt;

use crate::features::{encode, PatientRecord};
use crate::model::SharedClassifier;
use crate::{Recurrence, ThyroidError};

/// What the result page shows for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    Label(Recurrence),
    ModelNotLoaded,
    Failed(String),
}

impl fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionOutcome::Label(label) => write!(f, "{}", label),
            PredictionOutcome::ModelNotLoaded => write!(f, "Model not loaded"),
            PredictionOutcome::Failed(message) => write!(f, "Prediction error: {}", message),
        }
    }
}

/// Predictor for recurrence outcomes
#[derive(Clone)]
pub struct Predictor {
    classifier: SharedClassifier,
}

impl Predictor {
    pub fn new(classifier: SharedClassifier) -> Self {
        Predictor { classifier }
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Encode and classify one patient. Never fails: an unavailable model or a
    /// classifier error becomes a displayable outcome.
    pub fn predict(&self, record: &PatientRecord) -> PredictionOutcome {
        let Some(classifier) = &self.classifier else {
            return PredictionOutcome::ModelNotLoaded;
        };

        let features = encode(record);
        match classifier.predict(&features) {
            Ok(class) => {
                let label = Recurrence::from_class(class);
                log::debug!("Predicted recurrence={} (class {})", label, class);
                PredictionOutcome::Label(label)
            }
            Err(ThyroidError::Prediction(message)) => PredictionOutcome::Failed(message),
            Err(e) => PredictionOutcome::Failed(e.to_string()),
        }
    }
}

/// Format a prediction for display
pub fn format_prediction(record: &PatientRecord, outcome: &PredictionOutcome) -> String {
    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Patient: age {}, {}, risk {}, stage {}
│  Tumour:  {} {} {}
├─────────────────────────────────────────────────┤
│  Recurrence: {}
└─────────────────────────────────────────────────┘
"#,
        record.age,
        record.gender,
        record.risk,
        record.stage,
        record.t,
        record.n,
        record.m,
        outcome
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use crate::model::Classifier;
    use crate::Result;
    use std::sync::Arc;

    struct Fixed(u8);

    impl Classifier for Fixed {
        fn predict(&self, _features: &FeatureVector) -> Result<u8> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _features: &FeatureVector) -> Result<u8> {
            Err(ThyroidError::Prediction("shape mismatch".to_string()))
        }
    }

    #[test]
    fn test_labels() {
        let record = PatientRecord::default();
        let yes = Predictor::new(Some(Arc::new(Fixed(1))));
        let no = Predictor::new(Some(Arc::new(Fixed(0))));

        assert_eq!(yes.predict(&record), PredictionOutcome::Label(Recurrence::Yes));
        assert_eq!(no.predict(&record).to_string(), "No");
    }

    #[test]
    fn test_model_not_loaded() {
        let predictor = Predictor::new(None);
        assert!(!predictor.is_loaded());
        let outcome = predictor.predict(&PatientRecord::default());
        assert_eq!(outcome, PredictionOutcome::ModelNotLoaded);
        assert_eq!(outcome.to_string(), "Model not loaded");
    }

    #[test]
    fn test_classifier_error_is_displayed() {
        let predictor = Predictor::new(Some(Arc::new(Broken)));
        let outcome = predictor.predict(&PatientRecord::default());
        assert!(matches!(outcome, PredictionOutcome::Failed(_)));
        assert_eq!(outcome.to_string(), "Prediction error: shape mismatch");
    }

    #[test]
    fn test_format_prediction() {
        let text = format_prediction(
            &PatientRecord::default(),
            &PredictionOutcome::Label(Recurrence::No),
        );
        assert!(text.contains("age 34"));
        assert!(text.contains("Recurrence: No"));
    }
}
