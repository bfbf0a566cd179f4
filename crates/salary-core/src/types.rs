//! Core types for prediction requests and responses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::validation::ValidationErrors;

/// Message returned by the service root
pub const WELCOME_MESSAGE: &str = "Welcome to the Salary Prediction API!";

/// An input field of a prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    Gender,
    EducationLevel,
    YearsOfExperience,
}

impl Field {
    /// All fields, in feature-vector order
    pub const ALL: [Field; 4] = [
        Field::Age,
        Field::Gender,
        Field::EducationLevel,
        Field::YearsOfExperience,
    ];

    /// Field name as it appears in the JSON body
    pub fn name(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::EducationLevel => "EducationLevel",
            Self::YearsOfExperience => "YearsOfExperience",
        }
    }

    /// Inclusive range of accepted values
    pub fn bounds(&self) -> RangeInclusive<i64> {
        match self {
            Self::Age => 18..=65,
            Self::Gender => 0..=1,
            Self::EducationLevel => 0..=2,
            Self::YearsOfExperience => 0..=50,
        }
    }

    /// Position of this field in the feature vector
    pub fn index(&self) -> usize {
        match self {
            Self::Age => 0,
            Self::Gender => 1,
            Self::EducationLevel => 2,
            Self::YearsOfExperience => 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A prediction request whose fields are all within bounds.
///
/// Instances only exist after validation, either through [`PredictionRequest::new`]
/// or the JSON parsers in [`crate::validation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Gender")]
    gender: u8,
    #[serde(rename = "EducationLevel")]
    education_level: u8,
    #[serde(rename = "YearsOfExperience")]
    years_of_experience: u8,
}

impl PredictionRequest {
    /// Build a request from raw integers, checking every bound
    pub fn new(
        age: i64,
        gender: i64,
        education_level: i64,
        years_of_experience: i64,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let values = [age, gender, education_level, years_of_experience];
        for field in Field::ALL {
            errors.check_bounds(field, values[field.index()]);
        }
        errors.into_result()?;
        Ok(Self::from_checked(values))
    }

    /// Assemble from values already checked against [`Field::bounds`]
    pub(crate) fn from_checked(values: [i64; 4]) -> Self {
        // Every bound fits in a u8
        Self {
            age: values[0] as u8,
            gender: values[1] as u8,
            education_level: values[2] as u8,
            years_of_experience: values[3] as u8,
        }
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> u8 {
        self.gender
    }

    pub fn education_level(&self) -> u8 {
        self.education_level
    }

    pub fn years_of_experience(&self) -> u8 {
        self.years_of_experience
    }

    /// Feature vector in the fixed order the model was trained on
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            f64::from(self.age),
            f64::from(self.gender),
            f64::from(self.education_level),
            f64::from(self.years_of_experience),
        ])
    }
}

/// Ordered model input: `[Age, Gender, EducationLevel, YearsOfExperience]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; 4]);

impl FeatureVector {
    /// Number of features every model must accept
    pub const LEN: usize = 4;

    pub fn new(values: [f64; 4]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_array(&self) -> &[f64; 4] {
        &self.0
    }

    /// Single-precision copy for tensor backends
    pub fn to_f32(&self) -> [f32; 4] {
        self.0.map(|v| v as f32)
    }
}

impl From<PredictionRequest> for FeatureVector {
    fn from(req: PredictionRequest) -> Self {
        req.features()
    }
}

/// Successful prediction body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_salary: f64,
}

/// Root endpoint body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub message: String,
}

impl Default for WelcomeMessage {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let req = PredictionRequest::new(30, 1, 2, 5).unwrap();
        assert_eq!(req.features().as_array(), &[30.0, 1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_field_indices_match_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_new_rejects_every_bad_field() {
        let errors = PredictionRequest::new(10, 2, 3, 51).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(PredictionRequest::new(18, 0, 0, 0).is_ok());
        assert!(PredictionRequest::new(65, 1, 2, 50).is_ok());
        assert!(PredictionRequest::new(17, 0, 0, 0).is_err());
        assert!(PredictionRequest::new(66, 0, 0, 0).is_err());
    }

    #[test]
    fn test_request_serializes_with_wire_names() {
        let req = PredictionRequest::new(30, 1, 2, 5).unwrap();
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Age": 30, "Gender": 1, "EducationLevel": 2, "YearsOfExperience": 5})
        );
    }

    #[test]
    fn test_welcome_message() {
        let json = serde_json::to_string(&WelcomeMessage::default()).unwrap();
        assert_eq!(json, r#"{"message":"Welcome to the Salary Prediction API!"}"#);
    }
}
