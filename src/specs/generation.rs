use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::ActFnDesc;

fn default_random_range() -> (f64, f64) {
    (0.5, 1.0)
}

/// How activation functions are assigned to the layers of a generated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActFnAssignment {
    /// One activation function shared by every unit of every layer.
    Shared(ActFnDesc),
    /// One activation function per layer, aligned with the layer widths.
    PerLayer(Vec<ActFnDesc>),
}

/// The specification for generating a model with random connection weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSpec {
    pub name: String,
    pub desc: String,
    pub input_width: NonZeroUsize,
    pub layer_widths: Vec<NonZeroUsize>,
    pub act_fns: ActFnAssignment,
    /// The closed interval connection weights are drawn from.
    #[serde(default = "default_random_range")]
    pub random_range: (f64, f64),
    pub seed: Option<u64>,
}
