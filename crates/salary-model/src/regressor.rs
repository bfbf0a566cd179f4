//! Regressor trait and inference entry point

use salary_core::{Error, FeatureVector, Result};
use std::time::Instant;

/// Trait for all loaded salary models.
///
/// Implementations are immutable after loading and must be safe to call
/// from many requests at once.
pub trait Regressor: Send + Sync {
    /// Predict a single value for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Get the model name
    fn name(&self) -> &str;

    /// Get the estimator family
    fn kind(&self) -> RegressorKind;
}

/// Estimator family of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressorKind {
    Linear,
    DecisionTree,
    RandomForest,
    GradientBoosting,
    /// Linear head evaluated with tensors
    TensorLinear,
}

impl RegressorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::DecisionTree => "decision_tree",
            Self::RandomForest => "random_forest",
            Self::GradientBoosting => "gradient_boosting",
            Self::TensorLinear => "tensor_linear",
        }
    }
}

/// Result of a single inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    /// Predicted value
    pub value: f64,

    /// Latency in microseconds
    pub latency_us: u64,
}

/// Run the model on one feature vector, rejecting non-finite output
pub fn infer(model: &dyn Regressor, features: &FeatureVector) -> Result<Inference> {
    let start = Instant::now();
    let value = model.predict(features)?;

    if !value.is_finite() {
        return Err(Error::inference(format!(
            "model '{}' produced a non-finite prediction ({})",
            model.name(),
            value
        )));
    }

    Ok(Inference {
        value,
        latency_us: start.elapsed().as_micros() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl Regressor for Constant {
        fn predict(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "constant"
        }

        fn kind(&self) -> RegressorKind {
            RegressorKind::Linear
        }
    }

    #[test]
    fn test_infer_passes_value_through() {
        let features = FeatureVector::new([30.0, 1.0, 2.0, 5.0]);
        let inference = infer(&Constant(85_000.5), &features).unwrap();
        assert_eq!(inference.value, 85_000.5);
    }

    #[test]
    fn test_infer_rejects_nan_and_infinity() {
        let features = FeatureVector::new([30.0, 1.0, 2.0, 5.0]);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = infer(&Constant(value), &features).unwrap_err();
            assert!(matches!(err, Error::Inference(_)));
            assert!(err.to_string().contains("non-finite"));
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(RegressorKind::RandomForest.as_str(), "random_forest");
        assert_eq!(RegressorKind::TensorLinear.as_str(), "tensor_linear");
    }
}
