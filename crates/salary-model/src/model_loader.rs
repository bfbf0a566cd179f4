//! Model artifact loading
//!
//! The artifact is read exactly once at startup. A missing file is a
//! configuration error; a file that cannot be turned into a working
//! regressor is a model error. Both are meant to abort the process.

use salary_core::{Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::linear::LinearRegression;
use crate::regressor::{Regressor, RegressorKind};
use crate::tensor::TensorLinear;
use crate::tree::{DecisionTree, GradientBoosting, RandomForest, TreeEstimator, TreeModel};

/// Default artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Configuration for loading a model artifact
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Path to the artifact
    pub path: PathBuf,

    /// Explicit format; inferred from the extension when unset
    pub format: Option<ModelFormat>,
}

/// Artifact file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Estimator document (linear, tree, forest, boosting)
    Json,
    /// Linear head weights
    SafeTensors,
}

impl ModelFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("safetensors") => Ok(Self::SafeTensors),
            other => Err(Error::config(format!(
                "Cannot infer model format from extension {:?} of {:?} (expected .json or .safetensors)",
                other.unwrap_or(""),
                path
            ))),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::from_local(DEFAULT_MODEL_PATH)
    }
}

impl ModelConfig {
    /// Create a new model configuration from local path
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
        }
    }

    /// Set model format
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// JSON artifact document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDocument {
    /// Display name; defaults to the file stem
    #[serde(default)]
    pub name: Option<String>,

    /// Declared input width, checked against the feature vector
    #[serde(default)]
    pub n_features: Option<usize>,

    #[serde(flatten)]
    pub estimator: Estimator,
}

/// Estimator families a JSON artifact can describe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
}

/// Descriptive information about a loaded model
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,

    /// Estimator family
    pub kind: RegressorKind,

    /// Artifact format
    pub format: ModelFormat,

    /// Artifact path (for reference)
    pub path: PathBuf,
}

/// A regressor loaded from disk, ready to be shared across requests
pub struct LoadedModel {
    regressor: Arc<dyn Regressor>,
    metadata: ModelMetadata,
}

impl LoadedModel {
    /// Load a model from configuration
    pub fn load(config: ModelConfig) -> Result<Self> {
        let path = Self::resolve_model_path(&config)?;
        let format = match config.format {
            Some(format) => format,
            None => ModelFormat::from_path(&path)?,
        };
        let default_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        debug!("Loading {:?} model artifact from {:?}", format, path);

        let regressor: Arc<dyn Regressor> = match format {
            ModelFormat::Json => {
                let bytes = std::fs::read(&path)?;
                Arc::from(build_from_json(&bytes, &default_name)?)
            }
            ModelFormat::SafeTensors => Arc::new(TensorLinear::load(&path, default_name)?),
        };

        let metadata = ModelMetadata {
            name: regressor.name().to_string(),
            kind: regressor.kind(),
            format,
            path,
        };

        info!(
            "Loaded model '{}' ({}) from {:?}",
            metadata.name,
            metadata.kind.as_str(),
            metadata.path
        );

        Ok(Self {
            regressor,
            metadata,
        })
    }

    /// Check that the artifact exists before trying to decode it
    fn resolve_model_path(config: &ModelConfig) -> Result<PathBuf> {
        if !config.path.exists() {
            return Err(Error::config(format!(
                "Model file not found: {:?}",
                config.path
            )));
        }
        if !config.path.is_file() {
            return Err(Error::config(format!(
                "Model path is not a file: {:?}",
                config.path
            )));
        }
        Ok(config.path.clone())
    }

    /// Get model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn into_regressor(self) -> Arc<dyn Regressor> {
        self.regressor
    }
}

/// Decode and check a JSON artifact
pub fn build_from_json(bytes: &[u8], default_name: &str) -> Result<Box<dyn Regressor>> {
    let document: ArtifactDocument = serde_json::from_slice(bytes)
        .map_err(|e| Error::model(format!("Failed to decode model artifact: {}", e)))?;

    if let Some(n) = document.n_features {
        if n != FeatureVector::LEN {
            return Err(Error::model(format!(
                "model was fitted on {} features, service provides {}",
                n,
                FeatureVector::LEN
            )));
        }
    }

    let name = document
        .name
        .unwrap_or_else(|| default_name.to_string());

    let regressor: Box<dyn Regressor> = match document.estimator {
        Estimator::Linear(model) => {
            model.check()?;
            Box::new(model.with_name(name))
        }
        Estimator::DecisionTree(tree) => {
            Box::new(TreeModel::new(name, TreeEstimator::Single(tree))?)
        }
        Estimator::RandomForest(forest) => {
            Box::new(TreeModel::new(name, TreeEstimator::Forest(forest))?)
        }
        Estimator::GradientBoosting(boosted) => {
            Box::new(TreeModel::new(name, TreeEstimator::Boosted(boosted))?)
        }
    };

    Ok(regressor)
}
