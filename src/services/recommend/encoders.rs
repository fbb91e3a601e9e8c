use std::collections::{BTreeMap, HashMap};

use crate::models::Feature;

use super::{loader::LoadError, RecommendError};

/// Fixed label → code mapping for one categorical feature
///
/// The code of a label is its position in the fitted class list.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Builds an encoder from the fitted class list
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (position, label) in classes.iter().enumerate() {
            let code = u32::try_from(position).map_err(|_| "vocabulary too large".to_string())?;
            if codes.insert(label.clone(), code).is_some() {
                return Err(format!("duplicate label '{}'", label));
            }
        }
        Ok(Self { codes })
    }

    pub fn encode(&self, label: &str) -> Option<u32> {
        self.codes.get(label).copied()
    }
}

/// Encoders for every categorical feature the model was fitted with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureEncoders {
    encoders: HashMap<Feature, LabelEncoder>,
}

impl FeatureEncoders {
    /// Validates raw vocabularies keyed by training column name
    pub fn from_vocabularies(
        vocabularies: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, LoadError> {
        let mut encoders = HashMap::with_capacity(vocabularies.len());
        for (name, classes) in vocabularies {
            let feature: Feature = name.parse().map_err(LoadError::Invalid)?;
            let encoder = LabelEncoder::new(classes)
                .map_err(|e| LoadError::Invalid(format!("{}: {}", feature, e)))?;
            encoders.insert(feature, encoder);
        }
        Ok(Self { encoders })
    }

    pub fn insert(&mut self, feature: Feature, encoder: LabelEncoder) {
        self.encoders.insert(feature, encoder);
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Encodes a label of a feature that has a registered encoder
    ///
    /// Returns `Ok(None)` when the feature has no encoder, leaving the value
    /// to numeric coercion.
    pub fn encode(&self, feature: Feature, label: &str) -> Result<Option<u32>, RecommendError> {
        let Some(encoder) = self.encoders.get(&feature) else {
            return Ok(None);
        };
        encoder
            .encode(label)
            .map(Some)
            .ok_or_else(|| RecommendError::UnseenLabel {
                feature,
                label: label.to_string(),
            })
    }
}
