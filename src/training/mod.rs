mod model_trainer;
mod report;
mod spec;

pub use model_trainer::ModelTrainer;
pub use report::EpochReport;
pub use spec::TrainerSpec;
