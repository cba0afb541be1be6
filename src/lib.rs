pub mod arch;
pub mod error;
pub mod initialization;
pub mod training;

pub use error::{MlErr, Result};
