//! Mock regressors and request helpers for router tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use salary_api::{create_router, AppState};
use salary_core::{Error, FeatureVector, Result};
use salary_model::{LinearRegression, Regressor, RegressorKind};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Wraps a regressor and counts how often it is invoked
pub struct CountingRegressor<R> {
    inner: R,
    call_count: AtomicU32,
}

impl<R: Regressor> CountingRegressor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of times predict was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl<R: Regressor> Regressor for CountingRegressor<R> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.inner.predict(features)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> RegressorKind {
        self.inner.kind()
    }
}

/// A regressor that always fails or returns a fixed value
pub struct FixedRegressor {
    outcome: std::result::Result<f64, String>,
}

impl FixedRegressor {
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
        }
    }

    pub fn returning(value: f64) -> Self {
        Self { outcome: Ok(value) }
    }
}

impl Regressor for FixedRegressor {
    fn predict(&self, _features: &FeatureVector) -> Result<f64> {
        self.outcome.clone().map_err(Error::inference)
    }

    fn name(&self) -> &str {
        "fixed"
    }

    fn kind(&self) -> RegressorKind {
        RegressorKind::Linear
    }
}

/// `20000 + 1000*Age + 500*Gender + 10000*EducationLevel + 2500*YearsOfExperience`
pub fn salary_model() -> LinearRegression {
    LinearRegression::new(vec![1000.0, 500.0, 10_000.0, 2_500.0], 20_000.0).unwrap()
}

/// Router over a counting linear model, plus the counter handle
pub fn counting_app() -> (Router, Arc<CountingRegressor<LinearRegression>>) {
    let model = Arc::new(CountingRegressor::new(salary_model()));
    let app = create_router(AppState::new(model.clone()));
    (app, model)
}

pub fn app_with(model: impl Regressor + 'static) -> Router {
    create_router(AppState::new(Arc::new(model)))
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn text_body(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
