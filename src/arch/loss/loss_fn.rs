use ndarray::{Array1, ArrayView1};

use crate::Result;

/// A loss function over a single sample.
pub trait LossFn {
    /// Measures the distance between a prediction and its target.
    fn loss(&self, y_pred: ArrayView1<f32>, y: ArrayView1<f32>) -> Result<f32>;

    /// The gradient of `loss` w.r.t. every element of `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView1<f32>, y: ArrayView1<f32>) -> Result<Array1<f32>>;
}
