pub mod classifier;
pub mod curve;

pub use classifier::StatusClassifier;
pub use curve::resolve_stage_delta;
