use ndarray::ArrayView1;

use crate::{Result, arch::loss::LossFn};

pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Runs one training step on a single sample. **The parameters get updated** by a gradient
    /// descent step of length `learning_rate`.
    ///
    /// # Arguments
    /// * `x` - The input sample.
    /// * `y` - The expected output.
    /// * `loss_fn` - The loss function.
    /// * `learning_rate` - The length of the gradient descent step.
    ///
    /// # Returns
    /// The loss of the prediction made before the update.
    fn train_step<L>(
        &mut self,
        x: ArrayView1<f32>,
        y: ArrayView1<f32>,
        loss_fn: &L,
        learning_rate: f32,
    ) -> Result<f32>
    where
        L: LossFn;
}
