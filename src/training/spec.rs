use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::Result;

/// The description of a training run.
///
/// Every field is optional when deserializing, missing ones take the default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSpec {
    /// The amount of training steps.
    pub epochs: usize,
    pub learning_rate: f32,
    /// A report is emitted every `report_every` epochs, starting at epoch 0.
    pub report_every: usize,
    /// The seed for parameter initialization, `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainerSpec {
    fn default() -> Self {
        Self {
            epochs: 1000,
            learning_rate: 0.01,
            report_every: 100,
            seed: None,
        }
    }
}

impl TrainerSpec {
    /// Parses a spec from its json representation.
    ///
    /// # Returns
    /// The parsed spec or `MlErr::InvalidSpec` if the json doesn't describe one.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Builds the random number generator this spec asks for.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
