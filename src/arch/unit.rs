use std::{mem, sync::Arc};

use super::activations::ActFn;
use crate::{NetErr, Result, specs::UnitDesc};

/// A single perceptron: the weighted sum of its inputs plus a bias, passed through an
/// activation function.
///
/// The weight vector has `1 + fan_in` entries, index 0 being the bias weight and the rest
/// being the connection weights in the same order as the unit's inputs.
#[derive(Clone, Debug)]
pub struct Unit {
    weights: Vec<f64>,
    act_fn: Arc<ActFn>,

    // Forward metadata
    pending: Vec<f64>,
    last_inputs: Vec<f64>,
    output: Option<f64>,
}

impl Unit {
    /// Creates a new `Unit`.
    ///
    /// # Arguments
    /// * `weights` - The bias weight followed by one weight per input.
    /// * `act_fn` - The activation function, possibly shared with other units.
    ///
    /// # Errors
    /// `NetErr::ShapeMismatch` if `weights` doesn't even hold the bias weight.
    pub fn new(weights: Vec<f64>, act_fn: Arc<ActFn>) -> Result<Self> {
        if weights.is_empty() {
            return Err(NetErr::ShapeMismatch {
                what: "unit weights",
                got: 0,
                expected: 1,
            });
        }

        Ok(Self {
            weights,
            act_fn,
            pending: Vec::new(),
            last_inputs: Vec::new(),
            output: None,
        })
    }

    /// Rebuilds a unit from its description.
    pub fn from_desc(desc: &UnitDesc) -> Result<Self> {
        let act_fn = ActFn::from_desc(&desc.a)?;
        Self::new(desc.w.clone(), Arc::new(act_fn))
    }

    /// Describes this unit, bias weight included.
    pub fn describe(&self) -> UnitDesc {
        UnitDesc {
            w: self.weights.clone(),
            a: self.act_fn.describe(),
        }
    }

    /// The amount of inputs this unit expects.
    pub fn fan_in(&self) -> usize {
        self.weights.len() - 1
    }

    pub fn bias(&self) -> f64 {
        self.weights[0]
    }

    /// The connection weights, without the bias weight.
    pub fn weights(&self) -> &[f64] {
        &self.weights[1..]
    }

    pub fn act_fn(&self) -> &Arc<ActFn> {
        &self.act_fn
    }

    /// The inputs consumed by the last activation.
    pub fn last_inputs(&self) -> &[f64] {
        &self.last_inputs
    }

    /// The output of the last activation, `None` if the unit was never activated.
    pub fn output(&self) -> Option<f64> {
        self.output
    }

    /// Queues an input for the next activation.
    pub fn signal(&mut self, value: f64) {
        self.pending.push(value);
    }

    /// Activates the unit.
    ///
    /// Non empty `inputs` replace whatever was signaled so far. The consumed inputs are kept
    /// as `last_inputs` and the pending buffer is left empty, even on a shape mismatch.
    ///
    /// # Arguments
    /// * `inputs` - Optional external inputs.
    ///
    /// # Returns
    /// The unit's new output.
    ///
    /// # Errors
    /// `NetErr::MissingInput` if there's nothing to consume, `NetErr::ShapeMismatch` if the
    /// amount of inputs differs from the fan-in. The output is left untouched on error.
    pub fn activate(&mut self, inputs: Option<&[f64]>) -> Result<f64> {
        if let Some(inputs) = inputs.filter(|x| !x.is_empty()) {
            self.pending.clear();
            self.pending.extend_from_slice(inputs);
        }

        if self.pending.is_empty() {
            return Err(NetErr::MissingInput);
        }

        let inputs = mem::take(&mut self.pending);
        if inputs.len() != self.fan_in() {
            return Err(NetErr::ShapeMismatch {
                what: "unit inputs",
                got: inputs.len(),
                expected: self.fan_in(),
            });
        }

        let z: f64 = [1.]
            .iter()
            .chain(&inputs)
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum();

        let output = self.act_fn.f(z);
        self.output = Some(output);
        self.last_inputs = inputs;

        Ok(output)
    }

    /// Overwrites the connection weights. The bias weight is never touched.
    ///
    /// # Errors
    /// `NetErr::ShapeMismatch` if `weights` doesn't have exactly `fan_in` entries.
    pub fn update_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.fan_in() {
            return Err(NetErr::ShapeMismatch {
                what: "connection weights",
                got: weights.len(),
                expected: self.fan_in(),
            });
        }

        self.weights[1..].copy_from_slice(weights);
        Ok(())
    }
}
