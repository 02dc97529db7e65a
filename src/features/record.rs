//! Patient inputs as posted by the form

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::schema::{Field, AGE, DEFAULT_AGE, LEGACY_HX_RADIOTHERAPY};
use crate::{Result, ThyroidError};

/// The 16 named inputs, with documented defaults for anything missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    pub age: i64,
    pub gender: String,
    pub smoking: String,
    pub hx_smoking: String,
    pub hx_radiotherapy: String,
    pub thyroid_function: String,
    pub physical_examination: String,
    #[serde(rename = "Pathology")]
    pub pathology: String,
    pub risk: String,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Adenopathy")]
    pub adenopathy: String,
    #[serde(rename = "Focality")]
    pub focality: String,
    #[serde(rename = "T")]
    pub t: String,
    #[serde(rename = "N")]
    pub n: String,
    #[serde(rename = "M")]
    pub m: String,
}

impl Default for PatientRecord {
    fn default() -> Self {
        let d = |f: Field| f.default_value().to_string();
        PatientRecord {
            age: DEFAULT_AGE,
            gender: d(Field::Gender),
            smoking: d(Field::Smoking),
            hx_smoking: d(Field::HxSmoking),
            hx_radiotherapy: d(Field::HxRadiotherapy),
            thyroid_function: d(Field::ThyroidFunction),
            physical_examination: d(Field::PhysicalExamination),
            pathology: d(Field::Pathology),
            risk: d(Field::Risk),
            stage: d(Field::Stage),
            response: d(Field::Response),
            adenopathy: d(Field::Adenopathy),
            focality: d(Field::Focality),
            t: d(Field::T),
            n: d(Field::N),
            m: d(Field::M),
        }
    }
}

impl PatientRecord {
    /// Raw value of a categorical field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Gender => &self.gender,
            Field::Smoking => &self.smoking,
            Field::HxSmoking => &self.hx_smoking,
            Field::HxRadiotherapy => &self.hx_radiotherapy,
            Field::ThyroidFunction => &self.thyroid_function,
            Field::PhysicalExamination => &self.physical_examination,
            Field::Pathology => &self.pathology,
            Field::Risk => &self.risk,
            Field::Stage => &self.stage,
            Field::Response => &self.response,
            Field::Adenopathy => &self.adenopathy,
            Field::Focality => &self.focality,
            Field::T => &self.t,
            Field::N => &self.n,
            Field::M => &self.m,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Gender => &mut self.gender,
            Field::Smoking => &mut self.smoking,
            Field::HxSmoking => &mut self.hx_smoking,
            Field::HxRadiotherapy => &mut self.hx_radiotherapy,
            Field::ThyroidFunction => &mut self.thyroid_function,
            Field::PhysicalExamination => &mut self.physical_examination,
            Field::Pathology => &mut self.pathology,
            Field::Risk => &mut self.risk,
            Field::Stage => &mut self.stage,
            Field::Response => &mut self.response,
            Field::Adenopathy => &mut self.adenopathy,
            Field::Focality => &mut self.focality,
            Field::T => &mut self.t,
            Field::N => &mut self.n,
            Field::M => &mut self.m,
        }
    }

    pub fn set(&mut self, field: Field, value: &str) {
        *self.slot_mut(field) = value.to_string();
    }

    /// Set the age from raw form text
    pub fn set_age(&mut self, raw: &str) -> Result<()> {
        self.age = parse_age(raw)?;
        Ok(())
    }

    /// Build a record from form key/value pairs.
    ///
    /// Missing keys keep their defaults, unknown keys are ignored, and when a
    /// key repeats the first occurrence wins. `hx_radiotherapy` falls back to
    /// the legacy misspelled key when the correct one is absent.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = PatientRecord::default();
        let mut seen: HashSet<Field> = HashSet::new();
        let mut age_seen = false;
        let mut legacy_radiotherapy = None;

        for (key, value) in pairs {
            if key == AGE {
                if !age_seen {
                    record.set_age(value)?;
                    age_seen = true;
                }
            } else if key == LEGACY_HX_RADIOTHERAPY {
                legacy_radiotherapy.get_or_insert(value);
            } else if let Some(field) = Field::from_name(key) {
                if seen.insert(field) {
                    record.set(field, value);
                }
            }
        }

        if let Some(value) = legacy_radiotherapy {
            if !seen.contains(&Field::HxRadiotherapy) {
                record.set(Field::HxRadiotherapy, value);
            }
        }

        Ok(record)
    }
}

/// Parse an age the way the form has always accepted it: surrounding
/// whitespace, a leading sign and `_` digit-group separators (`1_000`) are
/// fine, anything else is an input error.
pub fn parse_age(raw: &str) -> Result<i64> {
    let text = raw.trim();
    let bytes = text.as_bytes();
    let grouped = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    let digits = if grouped {
        text.replace('_', "")
    } else {
        text.to_string()
    };

    digits.parse::<i64>().map_err(|e| ThyroidError::InvalidField {
        field: AGE.to_string(),
        message: format!("{:?} is not an integer ({})", raw, e),
    })
}
