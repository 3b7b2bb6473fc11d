mod description;
mod generation;
mod training;

pub use description::{ActFnDesc, LayerDesc, ModelDesc, UnitDesc};
pub use generation::{ActFnAssignment, GenerateSpec};
pub use training::TrainerSpec;
