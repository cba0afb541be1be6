use ndarray::ArrayView1;

use super::{Model, layers::Dense, loss::LossFn};
use crate::{MlErr, Result};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the gradients of its layers.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of, from input to output.
    ///
    /// # Returns
    /// A new `Sequential` instance, `MlErr::EmptyModel` if there are no layers or
    /// `MlErr::ShapeMismatch` if a layer's output doesn't feed the next layer's input.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        let layers: Vec<_> = layers.into_iter().collect();

        if layers.is_empty() {
            return Err(MlErr::EmptyModel);
        }

        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(MlErr::ShapeMismatch {
                    what: "chained layer input",
                    got: pair[1].input_size(),
                    expected: pair[0].output_size(),
                });
            }
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - The input data.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred. The prediction borrows the
    /// last layer's activations, not the input, so `x` may be dropped right after the call.
    pub fn forward(&mut self, x: ArrayView1<f32>) -> Result<ArrayView1<'_, f32>> {
        let (first, rest) = self.layers.split_first_mut().ok_or(MlErr::EmptyModel)?;

        let mut a = first.forward(x)?;
        for layer in rest {
            a = layer.forward(a)?;
        }

        Ok(a)
    }

    /// Makes a backward pass through the network, updating every layer on the way.
    ///
    /// Each layer receives the gradient w.r.t. its output from the layer after it.
    ///
    /// # Arguments
    /// * `d` - The gradient of the loss w.r.t. the network output.
    /// * `learning_rate` - The length of the gradient descent step.
    ///
    /// # Returns
    /// The gradient of the loss w.r.t. the network input or an error if occurred. Like the
    /// prediction, it borrows the model and not `d`.
    pub fn backward(
        &mut self,
        d: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<ArrayView1<'_, f32>> {
        let (last, rest) = self.layers.split_last_mut().ok_or(MlErr::EmptyModel)?;

        let mut d = last.backward(d, learning_rate)?;
        for layer in rest.iter_mut().rev() {
            d = layer.backward(d, learning_rate)?;
        }

        Ok(d)
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn train_step<L>(
        &mut self,
        x: ArrayView1<f32>,
        y: ArrayView1<f32>,
        loss_fn: &L,
        learning_rate: f32,
    ) -> Result<f32>
    where
        L: LossFn,
    {
        let y_pred = self.forward(x)?;
        let loss = loss_fn.loss(y_pred, y)?;
        let d_last = loss_fn.loss_prime(y_pred, y)?;

        self.backward(d_last.view(), learning_rate)?;

        Ok(loss)
    }
}
