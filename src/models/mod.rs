pub mod analysis;
pub mod curve;
pub mod nutrient;
pub mod requirements;
pub mod status;

pub use analysis::*;
pub use curve::*;
pub use nutrient::*;
pub use requirements::*;
pub use status::*;
