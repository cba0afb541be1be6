mod loss_fn;
mod mse;

pub use loss_fn::LossFn;
pub use mse::{Mse, mse_grad, mse_loss};
