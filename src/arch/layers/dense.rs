use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip, linalg};
use rand::Rng;

use crate::{
    MlErr, Result,
    arch::activations::Relu,
    error::check_len,
    initialization::{ConstParamGen, ParamGen, RandParamGen},
};

/// A fully connected layer followed by a ReLU activation.
///
/// The weights form a row-major `(output_size, input_size)` matrix, entry `(i, j)` connects input
/// `j` to output `i`. Besides its parameters the layer keeps the state of its last forward pass,
/// which the following `backward` call consumes, and the gradients that call computed.
///
/// Every buffer is allocated once here and reused by every pass.
#[derive(Clone, Debug)]
pub struct Dense {
    input_size: usize,
    output_size: usize,
    act_fn: Relu,

    weights: Array2<f32>,
    biases: Array1<f32>,

    // Forward metadata
    x: Array1<f32>,
    a: Array1<f32>,
    forwarded: bool,

    // Backward metadata
    dw: Array2<f32>,
    db: Array1<f32>,
    delta: Array1<f32>,
    d: Array1<f32>,
}

impl Dense {
    /// Creates a new `Dense` layer with He initialized weights and zero biases.
    ///
    /// # Arguments
    /// * `input_size` - The amount of inputs of the layer.
    /// * `output_size` - The amount of outputs (units) of the layer.
    /// * `rng` - The random number generator the weights are drawn from.
    ///
    /// # Returns
    /// A new `Dense` instance or `MlErr::InvalidDimensions` if any side is zero.
    pub fn new<R>(input_size: usize, output_size: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        check_dims(input_size, output_size)?;

        let nweights = input_size * output_size;
        let mut weight_gen = RandParamGen::he_uniform(rng, nweights, input_size)?;
        let mut bias_gen = ConstParamGen::zeros(output_size);

        let weights = draw(&mut weight_gen, nweights)?;
        let biases = draw(&mut bias_gen, output_size)?;

        Self::from_params(input_size, output_size, weights, biases)
    }

    /// Creates a new `Dense` layer from explicit parameters.
    ///
    /// # Arguments
    /// * `input_size` - The amount of inputs of the layer.
    /// * `output_size` - The amount of outputs (units) of the layer.
    /// * `weights` - `input_size * output_size` weights in row-major `(output_size, input_size)` order.
    /// * `biases` - `output_size` biases.
    ///
    /// # Returns
    /// A new `Dense` instance, `MlErr::InvalidDimensions` if any side is zero or
    /// `MlErr::ShapeMismatch` if the parameters don't fit the dimensions.
    pub fn from_params(
        input_size: usize,
        output_size: usize,
        weights: Vec<f32>,
        biases: Vec<f32>,
    ) -> Result<Self> {
        check_dims(input_size, output_size)?;
        check_len("weights", weights.len(), input_size * output_size)?;
        check_len("biases", biases.len(), output_size)?;

        let weights = Array2::from_shape_vec((output_size, input_size), weights)
            .map_err(|_| MlErr::InvalidInput("weights don't fit a row-major layout"))?;

        Ok(Self {
            input_size,
            output_size,
            act_fn: Relu::new(),
            weights,
            biases: Array1::from_vec(biases),
            x: Array1::zeros(input_size),
            a: Array1::zeros(output_size),
            forwarded: false,
            dw: Array2::zeros((output_size, input_size)),
            db: Array1::zeros(output_size),
            delta: Array1::zeros(output_size),
            d: Array1::zeros(input_size),
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        (self.input_size + 1) * self.output_size
    }

    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn biases(&self) -> ArrayView1<'_, f32> {
        self.biases.view()
    }

    /// The weight gradients computed by the last `backward` call, zeros before that.
    pub fn weight_grads(&self) -> ArrayView2<'_, f32> {
        self.dw.view()
    }

    /// The bias gradients computed by the last `backward` call, zeros before that.
    pub fn bias_grads(&self) -> ArrayView1<'_, f32> {
        self.db.view()
    }

    /// The input of the last forward pass, `None` if there was none yet.
    pub fn last_input(&self) -> Option<ArrayView1<'_, f32>> {
        self.forwarded.then(|| self.x.view())
    }

    /// The activation of the last forward pass, `None` if there was none yet.
    pub fn last_activation(&self) -> Option<ArrayView1<'_, f32>> {
        self.forwarded.then(|| self.a.view())
    }

    /// Makes a forward pass through the layer, `a = relu(W x + b)`.
    ///
    /// The input and the activation are kept for the next `backward` call.
    ///
    /// # Arguments
    /// * `x` - The input, of length `input_size`.
    ///
    /// # Returns
    /// A view of the activation or `MlErr::ShapeMismatch` if the input has the wrong length.
    pub fn forward(&mut self, x: ArrayView1<f32>) -> Result<ArrayView1<'_, f32>> {
        check_len("layer input", x.len(), self.input_size)?;

        self.x.assign(&x);

        self.a.assign(&self.biases);
        linalg::general_mat_vec_mul(1.0, &self.weights, &x, 1.0, &mut self.a);

        let act_fn = self.act_fn;
        self.a.mapv_inplace(|z| act_fn.f(z));
        self.forwarded = true;

        Ok(self.a.view())
    }

    /// Makes a backward pass through the layer and takes a gradient descent step.
    ///
    /// The gradient handed to the previous layer is computed with the weights as they were
    /// before this step.
    ///
    /// # Arguments
    /// * `upstream` - The gradient of the loss w.r.t. this layer's activation, of length `output_size`.
    /// * `learning_rate` - The length of the gradient descent step.
    ///
    /// # Returns
    /// A view of the gradient of the loss w.r.t. this layer's input, `MlErr::NotInitialized` if
    /// there was no forward pass yet or `MlErr::ShapeMismatch` if `upstream` has the wrong length.
    pub fn backward(
        &mut self,
        upstream: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<ArrayView1<'_, f32>> {
        if !self.forwarded {
            return Err(MlErr::NotInitialized);
        }
        check_len("upstream gradient", upstream.len(), self.output_size)?;

        let act_fn = self.act_fn;
        Zip::from(&mut self.delta)
            .and(&upstream)
            .and(&self.a)
            .for_each(|delta, &up, &a| *delta = up * act_fn.df(a));

        let delta = self.delta.view().insert_axis(Axis(1));
        let x = self.x.view().insert_axis(Axis(0));
        linalg::general_mat_mul(1.0, &delta, &x, 0.0, &mut self.dw);
        self.db.assign(&self.delta);

        linalg::general_mat_vec_mul(1.0, &self.weights.t(), &self.delta, 0.0, &mut self.d);

        self.weights.zip_mut_with(&self.dw, |w, &dw| *w -= learning_rate * dw);
        self.biases.zip_mut_with(&self.db, |b, &db| *b -= learning_rate * db);

        Ok(self.d.view())
    }
}

fn check_dims(input_size: usize, output_size: usize) -> Result<()> {
    if input_size == 0 || output_size == 0 {
        return Err(MlErr::InvalidDimensions {
            input_size,
            output_size,
        });
    }

    Ok(())
}

/// Samples exactly `n` parameters, a generator that runs out early is an error.
fn draw<G>(param_gen: &mut G, n: usize) -> Result<Vec<f32>>
where
    G: ParamGen,
{
    param_gen
        .sample(n)
        .filter(|params| params.len() == n)
        .ok_or(MlErr::InvalidInput("parameter generator exhausted"))
}
