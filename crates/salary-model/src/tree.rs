//! Decision tree ensembles
//!
//! Trees use the flattened array layout of scikit-learn's `tree_` attribute:
//! node `i` splits on `feature[i]` at `threshold[i]`, going to
//! `children_left[i]` when `x[feature] <= threshold` and to
//! `children_right[i]` otherwise. Leaves have both children set to `-1` and
//! carry their prediction in `value[i]`.

use salary_core::{Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};

use crate::regressor::{Regressor, RegressorKind};

const LEAF: i64 = -1;

/// A single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// A tree with a single leaf
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    /// Structural check run at load time.
    ///
    /// Children must point strictly forward, which rules out cycles and
    /// bounds every traversal by the node count.
    pub fn check(&self) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(Error::model("decision tree has no nodes"));
        }

        let lengths = [
            ("children_left", self.children_left.len()),
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
        ];
        for (array, len) in lengths {
            if len != n {
                return Err(Error::model(format!(
                    "decision tree array '{}' has {} entries, expected {}",
                    array, len, n
                )));
            }
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == LEAF && right == LEAF {
                continue;
            }
            if left == LEAF || right == LEAF {
                return Err(Error::model(format!(
                    "node {} has exactly one child",
                    node
                )));
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(Error::model(format!(
                        "node {} points to invalid child {}",
                        node, child
                    )));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature >= FeatureVector::LEN as i64 {
                return Err(Error::model(format!(
                    "node {} splits on feature {}, model accepts {} features",
                    node,
                    feature,
                    FeatureVector::LEN
                )));
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf
    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64> {
        let x = features.as_slice();
        let mut node = 0usize;

        // A checked tree reaches a leaf in at most `node_count` steps
        for _ in 0..self.node_count() {
            let left = *self
                .children_left
                .get(node)
                .ok_or_else(|| Error::inference(format!("node index {} out of range", node)))?;

            if left == LEAF {
                return Ok(self.value[node]);
            }

            let feature = self.feature[node] as usize;
            let value = *x.get(feature).ok_or_else(|| {
                Error::inference(format!("feature index {} out of range", feature))
            })?;

            node = if value <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }

        Err(Error::inference("tree traversal did not reach a leaf"))
    }
}

/// Average of independently fitted trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn check(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::model("random forest has no trees"));
        }
        check_all(&self.trees)
    }
}

/// Additive boosting: `init + learning_rate * Σ tree(x)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosting {
    pub init: f64,
    pub learning_rate: f64,
    pub trees: Vec<DecisionTree>,
}

impl GradientBoosting {
    pub fn check(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::model("gradient boosting model has no trees"));
        }
        check_all(&self.trees)
    }
}

fn check_all(trees: &[DecisionTree]) -> Result<()> {
    for (i, tree) in trees.iter().enumerate() {
        tree.check().map_err(|e| match e {
            Error::Model(msg) => Error::model(format!("tree {}: {}", i, msg)),
            other => other,
        })?;
    }
    Ok(())
}

/// A named tree-based estimator ready for inference
#[derive(Debug, Clone)]
pub struct TreeModel {
    name: String,
    estimator: TreeEstimator,
}

#[derive(Debug, Clone)]
pub enum TreeEstimator {
    Single(DecisionTree),
    Forest(RandomForest),
    Boosted(GradientBoosting),
}

impl TreeModel {
    /// Wrap an estimator after checking its structure
    pub fn new(name: impl Into<String>, estimator: TreeEstimator) -> Result<Self> {
        match &estimator {
            TreeEstimator::Single(tree) => tree.check()?,
            TreeEstimator::Forest(forest) => forest.check()?,
            TreeEstimator::Boosted(boosted) => boosted.check()?,
        }
        Ok(Self {
            name: name.into(),
            estimator,
        })
    }
}

impl Regressor for TreeModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        match &self.estimator {
            TreeEstimator::Single(tree) => tree.evaluate(features),
            TreeEstimator::Forest(forest) => {
                let mut sum = 0.0;
                for tree in &forest.trees {
                    sum += tree.evaluate(features)?;
                }
                Ok(sum / forest.trees.len() as f64)
            }
            TreeEstimator::Boosted(boosted) => {
                let mut sum = 0.0;
                for tree in &boosted.trees {
                    sum += tree.evaluate(features)?;
                }
                Ok(boosted.init + boosted.learning_rate * sum)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RegressorKind {
        match self.estimator {
            TreeEstimator::Single(_) => RegressorKind::DecisionTree,
            TreeEstimator::Forest(_) => RegressorKind::RandomForest,
            TreeEstimator::Boosted(_) => RegressorKind::GradientBoosting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on EducationLevel <= 1.5, then on YearsOfExperience <= 10
    fn salary_tree() -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            feature: vec![2, -2, 3, -2, -2],
            threshold: vec![1.5, -2.0, 10.0, -2.0, -2.0],
            value: vec![90_000.0, 60_000.0, 110_000.0, 95_000.0, 140_000.0],
        }
    }

    #[test]
    fn test_tree_traversal() {
        let tree = salary_tree();
        tree.check().unwrap();

        let bachelor = FeatureVector::new([30.0, 1.0, 0.0, 5.0]);
        let phd_junior = FeatureVector::new([30.0, 1.0, 2.0, 5.0]);
        let phd_senior = FeatureVector::new([50.0, 0.0, 2.0, 25.0]);

        assert_eq!(tree.evaluate(&bachelor).unwrap(), 60_000.0);
        assert_eq!(tree.evaluate(&phd_junior).unwrap(), 95_000.0);
        assert_eq!(tree.evaluate(&phd_senior).unwrap(), 140_000.0);
    }

    #[test]
    fn test_threshold_is_inclusive_left() {
        let tree = salary_tree();
        let at_threshold = FeatureVector::new([30.0, 1.0, 2.0, 10.0]);
        assert_eq!(tree.evaluate(&at_threshold).unwrap(), 95_000.0);
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut tree = salary_tree();
        tree.children_left[2] = 0;
        let err = tree.check().unwrap_err();
        assert!(err.to_string().contains("node 2 points to invalid child 0"));
    }

    #[test]
    fn test_rejects_bad_feature() {
        let mut tree = salary_tree();
        tree.feature[0] = 4;
        assert!(tree.check().is_err());
    }

    #[test]
    fn test_rejects_mismatched_arrays() {
        let mut tree = salary_tree();
        tree.threshold.pop();
        let err = tree.check().unwrap_err();
        assert!(err.to_string().contains("'threshold'"));
    }

    #[test]
    fn test_rejects_single_child() {
        let mut tree = salary_tree();
        tree.children_right[0] = -1;
        assert!(tree.check().is_err());
    }

    #[test]
    fn test_forest_averages() {
        let forest = RandomForest {
            trees: vec![DecisionTree::leaf(50_000.0), DecisionTree::leaf(70_000.0)],
        };
        let model = TreeModel::new("forest", TreeEstimator::Forest(forest)).unwrap();
        let features = FeatureVector::new([30.0, 1.0, 2.0, 5.0]);
        assert_eq!(model.predict(&features).unwrap(), 60_000.0);
        assert_eq!(model.kind(), RegressorKind::RandomForest);
    }

    #[test]
    fn test_empty_forest_rejected() {
        let err = TreeModel::new("empty", TreeEstimator::Forest(RandomForest { trees: vec![] }))
            .unwrap_err();
        assert!(err.to_string().contains("no trees"));
    }

    #[test]
    fn test_boosting_sum() {
        let boosted = GradientBoosting {
            init: 100_000.0,
            learning_rate: 0.5,
            trees: vec![DecisionTree::leaf(-10_000.0), salary_tree()],
        };
        let model = TreeModel::new("gbr", TreeEstimator::Boosted(boosted)).unwrap();
        let features = FeatureVector::new([30.0, 1.0, 0.0, 5.0]);
        // 100000 + 0.5 * (-10000 + 60000)
        assert_eq!(model.predict(&features).unwrap(), 125_000.0);
    }

    #[test]
    fn test_forest_error_names_tree() {
        let mut bad = salary_tree();
        bad.feature[2] = -7;
        let forest = RandomForest {
            trees: vec![salary_tree(), bad],
        };
        let err = forest.check().unwrap_err();
        assert!(err.to_string().contains("tree 1:"));
    }
}
