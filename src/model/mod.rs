//! Recurrence classifier
//!
//! Network definition, artifact loading, and the classifier seam.

pub mod classifier;
pub mod net;

pub use classifier::{load_classifier, Classifier, NetworkClassifier, SharedClassifier};
pub use net::{RecurrenceNet, RecurrenceNetConfig};
