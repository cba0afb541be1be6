use std::num::NonZeroUsize;

use log::{debug, info};
use ndarray::ArrayView1;

use super::{EpochReport, TrainerSpec};
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn},
};

/// A model `Trainer`. Contains the relevant components needed for training a model,
/// including the model itself.
pub struct ModelTrainer<M, L>
where
    M: Model,
    L: LossFn,
{
    model: M,
    loss_fn: L,

    epochs: NonZeroUsize,
    learning_rate: f32,
    report_every: NonZeroUsize,
}

impl<M, L> ModelTrainer<M, L>
where
    M: Model,
    L: LossFn,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `spec` - The description of the training run.
    ///
    /// # Returns
    /// A new trainer or `MlErr::InvalidInput` if the spec asks for zero epochs, a zero report
    /// interval or a learning rate that isn't a positive number.
    pub fn new(model: M, loss_fn: L, spec: &TrainerSpec) -> Result<Self> {
        let epochs = NonZeroUsize::new(spec.epochs)
            .ok_or(MlErr::InvalidInput("epochs must be positive"))?;
        let report_every = NonZeroUsize::new(spec.report_every)
            .ok_or(MlErr::InvalidInput("report interval must be positive"))?;

        if !spec.learning_rate.is_finite() || spec.learning_rate <= 0. {
            return Err(MlErr::InvalidInput("learning rate must be a positive number"));
        }

        Ok(Self {
            model,
            loss_fn,
            epochs,
            learning_rate: spec.learning_rate,
            report_every,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Trains the model on a single sample for the configured amount of epochs.
    ///
    /// # Arguments
    /// * `x` - The input sample.
    /// * `y` - The expected output.
    /// * `on_report` - Called with the epoch and its loss every `report_every` epochs, starting
    ///   at epoch 0.
    ///
    /// # Returns
    /// The loss of every epoch, measured before that epoch's update.
    pub fn train<F>(
        &mut self,
        x: ArrayView1<f32>,
        y: ArrayView1<f32>,
        mut on_report: F,
    ) -> Result<Vec<f32>>
    where
        F: FnMut(EpochReport),
    {
        let epochs = self.epochs.get();
        let mut losses = Vec::with_capacity(epochs);

        info!(
            epochs = epochs, learning_rate = self.learning_rate, params = self.model.size();
            "starting training"
        );

        for epoch in 0..epochs {
            let loss = self
                .model
                .train_step(x, y, &self.loss_fn, self.learning_rate)?;

            debug!(epoch = epoch, loss = loss; "finished epoch");
            losses.push(loss);

            if epoch % self.report_every == 0 {
                on_report(EpochReport { epoch, loss });
            }
        }

        if let (Some(first), Some(last)) = (losses.first(), losses.last()) {
            info!(first_loss = *first, last_loss = *last; "training finished");
        }

        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::arch::{Sequential, layers::Dense, loss::Mse};

    fn model() -> Sequential {
        Sequential::new([
            Dense::from_params(2, 2, vec![0.5, 0.5, -0.5, 0.25], vec![0., 0.]).unwrap(),
            Dense::from_params(2, 1, vec![0.5, 0.5], vec![0.]).unwrap(),
        ])
        .unwrap()
    }

    fn spec(epochs: usize, report_every: usize) -> TrainerSpec {
        TrainerSpec {
            epochs,
            report_every,
            ..Default::default()
        }
    }

    #[test]
    fn invalid_specs_are_rejected() {
        let bad = [
            spec(0, 100),
            spec(10, 0),
            TrainerSpec {
                learning_rate: 0.,
                ..Default::default()
            },
            TrainerSpec {
                learning_rate: f32::NAN,
                ..Default::default()
            },
        ];

        for spec in bad {
            assert!(
                matches!(
                    ModelTrainer::new(model(), Mse, &spec),
                    Err(MlErr::InvalidInput(_))
                ),
                "accepted {spec:?}"
            );
        }
    }

    #[test]
    fn reports_every_interval_starting_at_zero() {
        let mut trainer = ModelTrainer::new(model(), Mse, &spec(250, 100)).unwrap();
        let mut reports = Vec::new();

        let losses = trainer
            .train(array![1., 0.].view(), array![1.].view(), |r| reports.push(r))
            .unwrap();

        assert_eq!(losses.len(), 250);
        let epochs: Vec<_> = reports.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, [0, 100, 200]);
        for report in reports {
            assert_eq!(report.loss, losses[report.epoch]);
        }
    }

    #[test]
    fn training_lowers_the_loss() {
        let mut trainer = ModelTrainer::new(model(), Mse, &spec(200, 100)).unwrap();

        let losses = trainer
            .train(array![1., 0.].view(), array![1.].view(), |_| {})
            .unwrap();

        assert!(losses[losses.len() - 1] < losses[0]);
    }

    #[test]
    fn shape_errors_stop_the_training() {
        let mut trainer = ModelTrainer::new(model(), Mse, &spec(10, 1)).unwrap();
        let mut reports = 0;

        let result = trainer.train(array![1., 0., 3.].view(), array![1.].view(), |_| reports += 1);

        assert!(matches!(result, Err(MlErr::ShapeMismatch { .. })));
        assert_eq!(reports, 0);
    }
}
