use crate::models::{Feature, PreferenceInput};

use super::{
    encoders::FeatureEncoders,
    model::{FeatureOrder, PopularityModel},
    RecommendError,
};

/// Coerces a pass-through column to a number
///
/// Head counts must be non-negative whole numbers; any other column without
/// an encoder must at least be a finite number.
fn coerce(feature: Feature, raw: &str) -> Result<f64, RecommendError> {
    let trimmed = raw.trim();
    let parsed = if feature.is_count() {
        trimmed.parse::<u32>().ok().map(f64::from)
    } else {
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    };
    parsed.ok_or_else(|| RecommendError::Coercion {
        feature,
        value: raw.to_string(),
    })
}

/// Builds the model's feature row from a preference record
///
/// Columns with a registered encoder are replaced by their label code; the
/// rest are coerced to numbers.
pub fn encode_preferences(
    input: &PreferenceInput,
    encoders: &FeatureEncoders,
    order: &FeatureOrder,
) -> Result<Vec<f64>, RecommendError> {
    order
        .features()
        .iter()
        .map(|&feature| {
            let raw = input.value(feature);
            match encoders.encode(feature, raw)? {
                Some(code) => Ok(f64::from(code)),
                None => coerce(feature, raw),
            }
        })
        .collect()
}

/// Predicts the popularity of the described trip scenario
pub fn predict_popularity(
    input: &PreferenceInput,
    model: &dyn PopularityModel,
    encoders: &FeatureEncoders,
    order: &FeatureOrder,
) -> Result<f64, RecommendError> {
    let row = encode_preferences(input, encoders, order)?;
    let prediction = model.predict(&row)?;
    if !prediction.is_finite() {
        return Err(RecommendError::Model(format!(
            "{} model produced {}",
            model.name(),
            prediction
        )));
    }
    Ok(prediction)
}
