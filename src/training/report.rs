use std::fmt::{self, Display};

/// Progress of a training run, handed to the trainer's report callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// The loss measured before this epoch's update.
    pub loss: f32,
}

impl Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch {}, Loss: {:.4}", self.epoch, self.loss)
    }
}
