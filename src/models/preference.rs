use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Named input column of the popularity model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "Name_x")]
    Name,
    State,
    Type,
    BestTimeToVisit,
    Preferences,
    Gender,
    NumberOfAdults,
    NumberOfChildren,
}

impl Feature {
    /// Column order the popularity model was trained with
    pub const TRAINED_ORDER: [Feature; 8] = [
        Feature::Name,
        Feature::State,
        Feature::Type,
        Feature::BestTimeToVisit,
        Feature::Preferences,
        Feature::Gender,
        Feature::NumberOfAdults,
        Feature::NumberOfChildren,
    ];

    /// Column name as it appears in the training data
    pub fn name(self) -> &'static str {
        match self {
            Feature::Name => "Name_x",
            Feature::State => "State",
            Feature::Type => "Type",
            Feature::BestTimeToVisit => "BestTimeToVisit",
            Feature::Preferences => "Preferences",
            Feature::Gender => "Gender",
            Feature::NumberOfAdults => "NumberOfAdults",
            Feature::NumberOfChildren => "NumberOfChildren",
        }
    }

    /// Whether the column holds a head count rather than a label
    pub fn is_count(self) -> bool {
        matches!(self, Feature::NumberOfAdults | Feature::NumberOfChildren)
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::TRAINED_ORDER
            .into_iter()
            .find(|feature| feature.name() == s)
            .ok_or_else(|| format!("unknown feature '{}'", s))
    }
}

/// Trip scenario submitted for a popularity estimate
///
/// Every field arrives as text; head counts are coerced to numbers when the
/// feature vector is assembled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceInput {
    pub name: String,
    #[serde(rename = "type")]
    pub destination_type: String,
    pub state: String,
    pub best_time: String,
    pub preferences: String,
    pub gender: String,
    pub adults: String,
    pub children: String,
}

impl PreferenceInput {
    /// Raw text supplied for a model feature
    pub fn value(&self, feature: Feature) -> &str {
        match feature {
            Feature::Name => &self.name,
            Feature::State => &self.state,
            Feature::Type => &self.destination_type,
            Feature::BestTimeToVisit => &self.best_time,
            Feature::Preferences => &self.preferences,
            Feature::Gender => &self.gender,
            Feature::NumberOfAdults => &self.adults,
            Feature::NumberOfChildren => &self.children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_round_trips_through_name() {
        for feature in Feature::TRAINED_ORDER {
            assert_eq!(feature.name().parse::<Feature>().unwrap(), feature);
        }
        assert!("Budget".parse::<Feature>().is_err());
    }

    #[test]
    fn test_feature_serde_uses_training_column_name() {
        let json = serde_json::to_string(&Feature::Name).unwrap();
        assert_eq!(json, "\"Name_x\"");
    }

    #[test]
    fn test_preference_value_lookup() {
        let input: PreferenceInput = serde_json::from_value(serde_json::json!({
            "name": "Beach Resort",
            "type": "Beach",
            "state": "Goa",
            "best_time": "Winter",
            "preferences": "Relaxation",
            "gender": "Female",
            "adults": "2",
            "children": "1"
        }))
        .unwrap();

        assert_eq!(input.value(Feature::Name), "Beach Resort");
        assert_eq!(input.value(Feature::Type), "Beach");
        assert_eq!(input.value(Feature::NumberOfChildren), "1");
        assert!(Feature::NumberOfAdults.is_count());
        assert!(!Feature::Gender.is_count());
    }
}
