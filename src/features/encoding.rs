//! Categorical-to-numeric encoding of patient records

use super::record::PatientRecord;
use super::schema::{Encoding, AGE, FEATURE_DIM, FIELDS};

/// Encoded patient, in the exact column order the classifier was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector([i64; FEATURE_DIM]);

impl FeatureVector {
    /// Dimension of feature vector
    pub const DIM: usize = FEATURE_DIM;

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Convert to model input
    pub fn to_f32(&self) -> [f32; FEATURE_DIM] {
        self.0.map(|v| v as f32)
    }
}

/// Encode a record by walking the static tables in order, then appending age.
pub fn encode(record: &PatientRecord) -> FeatureVector {
    let mut values = [0i64; FEATURE_DIM];
    let mut offset = 0;

    for spec in FIELDS.iter() {
        let raw = record.get(spec.field);
        match &spec.encoding {
            Encoding::OneHot(table) => values[offset + table.slot(raw)] = 1,
            Encoding::Ordinal(table) => values[offset] = table.code(raw),
        }
        offset += spec.encoding.width();
    }

    values[offset] = record.age;
    debug_assert_eq!(offset + 1, FEATURE_DIM);

    FeatureVector(values)
}

/// Column label for every vector position.
///
/// One-hot columns are `name=category`, with `name=*` for the catch-all slot.
pub fn feature_labels() -> Vec<String> {
    let mut labels = Vec::with_capacity(FEATURE_DIM);
    for spec in FIELDS.iter() {
        match &spec.encoding {
            Encoding::OneHot(table) => {
                labels.extend(
                    table
                        .categories
                        .iter()
                        .map(|c| format!("{}={}", spec.name, c)),
                );
                labels.push(format!("{}=*", spec.name));
            }
            Encoding::Ordinal(_) => labels.push(spec.name.to_string()),
        }
    }
    labels.push(AGE.to_string());
    labels
}
