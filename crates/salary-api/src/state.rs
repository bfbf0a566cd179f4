//! Shared application state and the prediction flow

use metrics_exporter_prometheus::PrometheusHandle;
use salary_core::{PredictionRequest, PredictionResponse};
use salary_model::{infer, Regressor};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// The model, loaded once at startup and never replaced
    pub model: Arc<dyn Regressor>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self {
            model,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Validate a raw body and run it through the model
    pub fn predict_body(&self, body: &[u8]) -> Result<PredictionResponse, ApiError> {
        let request = PredictionRequest::from_json_bytes(body).map_err(|errors| {
            debug!("Rejected prediction request: {}", errors);
            metrics::counter!("salary_rejections_total", "reason" => errors.reason()).increment(1);
            ApiError::from(errors)
        })?;

        self.predict(&request)
    }

    /// Run a validated request through the model
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ApiError> {
        let features = request.features();

        let inference = infer(self.model.as_ref(), &features).map_err(|e| {
            warn!("Inference failed for {:?}: {}", features.as_array(), e);
            metrics::counter!("salary_rejections_total", "reason" => "inference").increment(1);
            ApiError::from(e)
        })?;

        metrics::histogram!("salary_inference_latency_us").record(inference.latency_us as f64);
        debug!(
            "Predicted {:.2} for {:?} in {}us",
            inference.value,
            features.as_array(),
            inference.latency_us
        );

        Ok(PredictionResponse {
            predicted_salary: inference.value,
        })
    }

    /// Render Prometheus metrics, or nothing when no exporter is installed
    pub fn render_metrics(&self) -> String {
        self.metrics_handle
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }
}
