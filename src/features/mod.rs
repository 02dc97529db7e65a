//! Feature extraction and encoding
//!
//! Converts raw form input into the classifier's feature vector.

pub mod encoding;
pub mod record;
pub mod schema;

pub use encoding::{encode, feature_labels, FeatureVector};
pub use record::PatientRecord;
pub use schema::{Field, FEATURE_DIM};
