use serde::Deserialize;

use crate::models::Feature;

use super::{loader::LoadError, RecommendError};

/// Pre-trained estimator mapping one feature row to a popularity score
#[cfg_attr(test, mockall::automock)]
pub trait PopularityModel: Send + Sync {
    /// Predicts the popularity of a single encoded row
    fn predict(&self, features: &[f64]) -> Result<f64, RecommendError>;

    /// Row width the model was trained on
    fn n_features(&self) -> usize;

    /// Model kind for logging
    fn name(&self) -> &'static str;
}

/// Column order of the feature vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureOrder(Vec<Feature>);

impl Default for FeatureOrder {
    fn default() -> Self {
        Self(Feature::TRAINED_ORDER.to_vec())
    }
}

impl FeatureOrder {
    /// Parses column names, which must name every model feature exactly once
    pub fn from_names(names: &[String]) -> Result<Self, LoadError> {
        let mut features = Vec::with_capacity(names.len());
        for name in names {
            let feature: Feature = name.parse().map_err(LoadError::Invalid)?;
            if features.contains(&feature) {
                return Err(LoadError::Invalid(format!("feature {} listed twice", feature)));
            }
            features.push(feature);
        }
        if features.len() != Feature::TRAINED_ORDER.len() {
            return Err(LoadError::Invalid(format!(
                "expected {} features, got {}",
                Feature::TRAINED_ORDER.len(),
                features.len()
            )));
        }
        Ok(Self(features))
    }

    pub fn features(&self) -> &[Feature] {
        &self.0
    }
}

fn check_width(expected: usize, features: &[f64]) -> Result<(), RecommendError> {
    if features.len() != expected {
        return Err(RecommendError::Model(format!(
            "expected {} features, got {}",
            expected,
            features.len()
        )));
    }
    Ok(())
}

// ============================================================================
// Linear Regression
// ============================================================================

/// Ordinary linear regression: `intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl PopularityModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, RecommendError> {
        check_width(self.coefficients.len(), features)?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

// ============================================================================
// Regression Tree Ensemble
// ============================================================================

/// Regression tree as parallel node arrays
///
/// A negative `feature` marks a leaf. Split nodes send a row left when
/// `x[feature] <= threshold`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeArrays {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub left: Vec<i64>,
    pub right: Vec<i64>,
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Validated regression tree
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Validates node arrays against the row width
    ///
    /// Children must come after their parent, which rules out cycles.
    pub fn from_arrays(arrays: &TreeArrays, n_features: usize) -> Result<Self, LoadError> {
        let n = arrays.feature.len();
        if n == 0 {
            return Err(LoadError::Invalid("tree has no nodes".to_string()));
        }
        if [
            arrays.threshold.len(),
            arrays.left.len(),
            arrays.right.len(),
            arrays.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(LoadError::Invalid("tree arrays differ in length".to_string()));
        }

        let child = |index: usize, raw: i64| -> Result<usize, LoadError> {
            usize::try_from(raw)
                .ok()
                .filter(|&c| c > index && c < n)
                .ok_or_else(|| {
                    LoadError::Invalid(format!("node {} has invalid child {}", index, raw))
                })
        };

        let mut nodes = Vec::with_capacity(n);
        for index in 0..n {
            let raw_feature = arrays.feature[index];
            let node = if raw_feature < 0 {
                TreeNode::Leaf(arrays.value[index])
            } else {
                let feature = usize::try_from(raw_feature)
                    .ok()
                    .filter(|&f| f < n_features)
                    .ok_or_else(|| {
                        LoadError::Invalid(format!(
                            "node {} splits on feature {} of {}",
                            index, raw_feature, n_features
                        ))
                    })?;
                TreeNode::Split {
                    feature,
                    threshold: arrays.threshold[index],
                    left: child(index, arrays.left[index])?,
                    right: child(index, arrays.right[index])?,
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    fn predict_row(&self, features: &[f64]) -> Result<f64, RecommendError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf(value)) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        RecommendError::Model(format!("missing feature {}", feature))
                    })?;
                    index = if x <= threshold { *left } else { *right };
                }
                None => {
                    return Err(RecommendError::Model(format!("dangling node {}", index)));
                }
            }
        }
    }
}

/// Random forest regressor: the mean of its trees' predictions
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(trees: Vec<RegressionTree>, n_features: usize) -> Result<Self, LoadError> {
        if trees.is_empty() {
            return Err(LoadError::Invalid("forest has no trees".to_string()));
        }
        Ok(Self { trees, n_features })
    }
}

impl PopularityModel for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<f64, RecommendError> {
        check_width(self.n_features, features)?;
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict_row(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}

// ============================================================================
// Serialized Artifact
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    Forest {
        trees: Vec<TreeArrays>,
    },
}

/// On-disk form of the trained popularity model
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Trained column order; the standard order when absent
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Validates the artifact into a ready model and its column order
    pub fn build(self) -> Result<(Box<dyn PopularityModel>, FeatureOrder), LoadError> {
        let order = match &self.feature_names {
            Some(names) => FeatureOrder::from_names(names)?,
            None => FeatureOrder::default(),
        };
        let width = order.features().len();

        let model: Box<dyn PopularityModel> = match self.estimator {
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != width {
                    return Err(LoadError::Invalid(format!(
                        "linear model has {} coefficients for {} features",
                        coefficients.len(),
                        width
                    )));
                }
                Box::new(LinearModel::new(intercept, coefficients))
            }
            Estimator::Forest { trees } => {
                let trees = trees
                    .iter()
                    .map(|arrays| RegressionTree::from_arrays(arrays, width))
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(RandomForest::new(trees, width)?)
            }
        };

        Ok((model, order))
    }
}
