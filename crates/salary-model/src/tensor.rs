//! Linear head stored as SafeTensors and evaluated with Candle

use candle_core::{DType, Device, Tensor};
use salary_core::{Error, FeatureVector, Result};
use std::path::Path;

use crate::regressor::{Regressor, RegressorKind};

/// Tensor name holding the weights, shape `[4]` or `[1, 4]`
pub const WEIGHT_TENSOR: &str = "weight";

/// Tensor name holding the bias, shape `[]` or `[1]`
pub const BIAS_TENSOR: &str = "bias";

/// `y = x · Wᵀ + b` on CPU
pub struct TensorLinear {
    name: String,
    /// Shape `(4, 1)`
    weight: Tensor,
    /// Shape `(1,)`
    bias: Tensor,
    device: Device,
}

impl TensorLinear {
    /// Load `weight` and `bias` tensors from a SafeTensors file
    pub fn load(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::Cpu;

        let mut tensors = candle_core::safetensors::load(path, &device).map_err(|e| {
            Error::model(format!("Failed to load SafeTensors {:?}: {}", path, e))
        })?;

        let weight = tensors
            .remove(WEIGHT_TENSOR)
            .ok_or_else(|| Error::model(format!("missing '{}' tensor", WEIGHT_TENSOR)))?;
        let bias = tensors
            .remove(BIAS_TENSOR)
            .ok_or_else(|| Error::model(format!("missing '{}' tensor", BIAS_TENSOR)))?;

        Self::from_tensors(name, weight, bias, device)
    }

    /// Build from in-memory tensors, normalizing shapes and dtype
    pub fn from_tensors(
        name: impl Into<String>,
        weight: Tensor,
        bias: Tensor,
        device: Device,
    ) -> Result<Self> {
        if weight.elem_count() != FeatureVector::LEN {
            return Err(Error::model(format!(
                "weight tensor has shape {:?}, expected {} elements",
                weight.dims(),
                FeatureVector::LEN
            )));
        }
        if bias.elem_count() != 1 {
            return Err(Error::model(format!(
                "bias tensor has shape {:?}, expected a single element",
                bias.dims()
            )));
        }

        let weight = weight
            .to_dtype(DType::F32)
            .and_then(|w| w.reshape((FeatureVector::LEN, 1)))
            .map_err(|e| Error::model(format!("Failed to prepare weight tensor: {}", e)))?;
        let bias = bias
            .to_dtype(DType::F32)
            .and_then(|b| b.reshape((1,)))
            .map_err(|e| Error::model(format!("Failed to prepare bias tensor: {}", e)))?;

        Ok(Self {
            name: name.into(),
            weight,
            bias,
            device,
        })
    }

    fn forward(&self, features: &FeatureVector) -> candle_core::Result<f32> {
        let x = Tensor::from_slice(&features.to_f32(), (1, FeatureVector::LEN), &self.device)?;
        let y = x.matmul(&self.weight)?.broadcast_add(&self.bias)?;
        y.flatten_all()?.get(0)?.to_scalar::<f32>()
    }
}

impl Regressor for TensorLinear {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        self.forward(features)
            .map(f64::from)
            .map_err(|e| Error::inference(format!("Model forward pass failed: {}", e)))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RegressorKind {
        RegressorKind::TensorLinear
    }
}
