use ndarray::{Array1, ArrayView1};

use super::LossFn;
use crate::{Result, error::check_len};

/// Mean squared error loss function.
#[derive(Default, Clone, Copy, Debug)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    fn loss(&self, y_pred: ArrayView1<f32>, y: ArrayView1<f32>) -> Result<f32> {
        mse_loss(y_pred, y)
    }

    fn loss_prime(&self, y_pred: ArrayView1<f32>, y: ArrayView1<f32>) -> Result<Array1<f32>> {
        mse_grad(y_pred, y)
    }
}

/// `Σ (output[i] - target[i])² / N`.
///
/// # Returns
/// The loss or `MlErr::ShapeMismatch` if the lengths differ.
pub fn mse_loss(output: ArrayView1<f32>, target: ArrayView1<f32>) -> Result<f32> {
    check_len("target", target.len(), output.len())?;

    let loss = (&output - &target)
        .mapv(|x| x.powi(2))
        .mean()
        .unwrap_or_default();

    Ok(loss)
}

/// `2 * (output[i] - target[i]) / N`, the gradient of `mse_loss` w.r.t. `output`.
///
/// # Returns
/// The gradient or `MlErr::ShapeMismatch` if the lengths differ.
pub fn mse_grad(output: ArrayView1<f32>, target: ArrayView1<f32>) -> Result<Array1<f32>> {
    check_len("target", target.len(), output.len())?;

    Ok((&output - &target) * (2.0 / output.len() as f32))
}
