use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::uniform::Error as UniformError;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    /// A length invariant was violated (e.g. an input that doesn't match the layer).
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// `backward` was called on a layer that never ran `forward`.
    NotInitialized,
    /// A layer was requested with a zero sized side.
    InvalidDimensions {
        input_size: usize,
        output_size: usize,
    },
    /// A model was requested without layers.
    EmptyModel,
    /// An input is invalid for domain reasons.
    InvalidInput(&'static str),
    /// A trainer spec could not be parsed.
    InvalidSpec(String),
    /// A parameter generator could not be built.
    Initialization(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
            MlErr::NotInitialized => {
                write!(f, "backward pass requested before any forward pass")
            }
            MlErr::InvalidDimensions {
                input_size,
                output_size,
            } => write!(
                f,
                "invalid layer dimensions {input_size}x{output_size}, both sides must be positive"
            ),
            MlErr::EmptyModel => write!(f, "a model needs at least one layer"),
            MlErr::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlErr::InvalidSpec(msg) => write!(f, "invalid trainer spec: {msg}"),
            MlErr::Initialization(msg) => write!(f, "failed to initialize parameters: {msg}"),
        }
    }
}

impl Error for MlErr {}

impl From<UniformError> for MlErr {
    fn from(value: UniformError) -> Self {
        Self::Initialization(value.to_string())
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidSpec(value.to_string())
    }
}

/// Checks that a sequence has the length a component expects.
///
/// # Arguments
/// * `what` - Human-readable context for the error.
/// * `got` - Observed length.
/// * `expected` - Expected length.
pub(crate) fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(MlErr::ShapeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}
