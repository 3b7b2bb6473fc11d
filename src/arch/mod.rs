pub mod activations;
mod builder;
mod model;
mod unit;

pub use builder::{ModelBuilder, widths};
pub use model::{LayerActFns, Model, UnitId};
pub use unit::Unit;
