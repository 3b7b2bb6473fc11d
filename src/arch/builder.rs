use std::{num::NonZeroUsize, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};

use super::{LayerActFns, Model, activations::ActFn};
use crate::{
    Result,
    specs::{ActFnAssignment, GenerateSpec},
};

/// Builds generated `Model`s given a specification.
#[derive(Default)]
pub struct ModelBuilder;

impl ModelBuilder {
    /// Creates a new `ModelBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Generates a new `Model` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the model.
    pub fn build(&self, spec: &GenerateSpec) -> Result<Model> {
        let act_fns = self.resolve_act_fns(&spec.act_fns)?;
        let layer_widths: Vec<_> = spec.layer_widths.iter().map(|w| w.get()).collect();
        let mut rng = self.generate_rng(spec.seed);

        Model::generate(
            &spec.name,
            &spec.desc,
            spec.input_width.get(),
            &layer_widths,
            &act_fns,
            spec.random_range,
            &mut rng,
        )
    }

    fn resolve_act_fns(&self, spec: &ActFnAssignment) -> Result<LayerActFns> {
        let act_fns = match spec {
            ActFnAssignment::Shared(desc) => LayerActFns::Shared(Arc::new(ActFn::from_desc(desc)?)),
            ActFnAssignment::PerLayer(descs) => {
                let act_fns = descs
                    .iter()
                    .map(|desc| ActFn::from_desc(desc).map(Arc::new))
                    .collect::<Result<Vec<_>>>()?;

                LayerActFns::PerLayer(act_fns)
            }
        };

        Ok(act_fns)
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Shorthand for building the widths of a `GenerateSpec`.
///
/// # Returns
/// `None` if any of the widths is zero.
pub fn widths(widths: &[usize]) -> Option<Vec<NonZeroUsize>> {
    widths.iter().map(|&w| NonZeroUsize::new(w)).collect()
}
