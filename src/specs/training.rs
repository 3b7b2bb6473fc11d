use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// The specification for the `Trainer` struct.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainerSpec {
    pub learning_rate: f64,
    pub epochs: NonZeroUsize,
    pub seed: Option<u64>,
}
