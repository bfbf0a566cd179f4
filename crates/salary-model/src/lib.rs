//! Salary Model
//!
//! Regression models behind the prediction endpoint.
//!
//! A model is loaded once from a single artifact and then shared read-only by
//! every request through `Arc<dyn Regressor>`. Supported artifacts:
//! - JSON estimator documents: linear regression, decision tree,
//!   random forest, gradient boosting
//! - SafeTensors linear heads evaluated with Candle

pub mod linear;
pub mod model_loader;
pub mod regressor;
pub mod tensor;
pub mod tree;

pub use linear::LinearRegression;
pub use model_loader::{
    build_from_json, ArtifactDocument, Estimator, LoadedModel, ModelConfig, ModelFormat,
    ModelMetadata, DEFAULT_MODEL_PATH,
};
pub use regressor::{infer, Inference, Regressor, RegressorKind};
pub use tensor::TensorLinear;
pub use tree::{DecisionTree, GradientBoosting, RandomForest, TreeEstimator, TreeModel};
