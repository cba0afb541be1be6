use anyhow::Result;
use log::info;
use ndarray::array;
use relu_net::{
    arch::{Sequential, layers::Dense, loss::Mse},
    training::{ModelTrainer, TrainerSpec},
};

fn main() -> Result<()> {
    env_logger::init();

    let spec = TrainerSpec::default();
    let mut rng = spec.rng();

    let model = Sequential::new([
        Dense::new(2, 4, &mut rng)?,
        Dense::new(4, 1, &mut rng)?,
    ])?;

    let x = array![0.5, -0.3];
    let y = array![1.0];

    let mut trainer = ModelTrainer::new(model, Mse, &spec)?;
    let losses = trainer.train(x.view(), y.view(), |report| println!("{report}"))?;

    info!("done after {} epochs", losses.len());
    Ok(())
}
