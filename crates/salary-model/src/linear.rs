//! Ordinary least-squares style linear model

use salary_core::{Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};

use crate::regressor::{Regressor, RegressorKind};

/// `y = intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,

    #[serde(skip, default = "default_name")]
    name: String,
}

fn default_name() -> String {
    "linear".to_string()
}

impl LinearRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            coefficients,
            intercept,
            name: default_name(),
        };
        model.check()?;
        Ok(model)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Structural check run at load time
    pub fn check(&self) -> Result<()> {
        if self.coefficients.len() != FeatureVector::LEN {
            return Err(Error::model(format!(
                "linear model has {} coefficients, expected {}",
                self.coefficients.len(),
                FeatureVector::LEN
            )));
        }
        Ok(())
    }
}

impl Regressor for LinearRegression {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RegressorKind {
        RegressorKind::Linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegression::new(vec![1000.0, 500.0, 10_000.0, 2_500.0], 20_000.0).unwrap();
        let features = FeatureVector::new([30.0, 1.0, 2.0, 5.0]);
        // 20000 + 30000 + 500 + 20000 + 12500
        assert_eq!(model.predict(&features).unwrap(), 83_000.0);
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let err = LinearRegression::new(vec![1.0, 2.0, 3.0], 0.0).unwrap_err();
        assert!(err.to_string().contains("3 coefficients, expected 4"));
    }

    #[test]
    fn test_deserialize_sets_default_name() {
        let model: LinearRegression =
            serde_json::from_str(r#"{"coefficients": [1, 2, 3, 4], "intercept": 0.5}"#).unwrap();
        assert_eq!(model.name(), "linear");
        assert!(model.check().is_ok());
    }
}
