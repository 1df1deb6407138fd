pub mod optimizer;

pub use optimizer::{OptimizerClient, OptimizerOutcome};
