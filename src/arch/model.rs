use std::sync::Arc;

use log::{info, trace};
use rand::Rng;

use super::{Unit, activations::ActFn};
use crate::{
    NetErr, Result,
    initialization::{RandWeightGen, WeightGen},
    specs::ModelDesc,
};

/// The stable index of a unit inside its model.
pub type UnitId = usize;

/// How activation functions are handed out to the layers of a generated model.
#[derive(Clone, Debug)]
pub enum LayerActFns {
    /// One activation function shared by every unit of every layer.
    Shared(Arc<ActFn>),
    /// One activation function per layer, shared by the units of that layer.
    PerLayer(Vec<Arc<ActFn>>),
}

/// A fully connected feed-forward network of `Unit`s.
///
/// Units live in an arena and are addressed by `UnitId`. Each layer holds the ids of its
/// units in order, and `upstream` holds, per unit, the ids of the units feeding it in
/// attachment order. Information only flows forward, so the model is the single owner of
/// every unit.
#[derive(Clone, Debug, Default)]
pub struct Model {
    name: String,
    desc: String,
    units: Vec<Unit>,
    layers: Vec<Vec<UnitId>>,
    upstream: Vec<Vec<UnitId>>,
}

impl Model {
    /// Creates a new, empty `Model`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from its description.
    pub fn from_desc(desc: &ModelDesc) -> Result<Self> {
        let mut model = Self::new();
        model.reconstruct(desc)?;
        Ok(model)
    }

    /// Replaces this model's whole state with the one described by `desc`.
    ///
    /// Every unit of a layer is attached to every unit of the next one. On error the model
    /// is left as it was.
    ///
    /// # Errors
    /// Unknown activation functions or weight vectors whose length doesn't fit the width of
    /// the previous layer.
    pub fn reconstruct(&mut self, desc: &ModelDesc) -> Result<()> {
        let mut model = Self {
            name: desc.name.clone(),
            desc: desc.desc.clone(),
            ..Self::default()
        };

        for layer_desc in &desc.layers {
            let units = layer_desc
                .iter()
                .map(Unit::from_desc)
                .collect::<Result<Vec<_>>>()?;

            model.push_layer(units)?;
        }

        info!(
            name = desc.name.as_str(), layers = model.layers.len(), units = model.units.len();
            "model reconstructed"
        );

        *self = model;
        Ok(())
    }

    /// Describes this model; the inverse of `reconstruct`.
    pub fn describe(&self) -> ModelDesc {
        let layers = self
            .layers
            .iter()
            .map(|layer| layer.iter().map(|&id| self.units[id].describe()).collect())
            .collect();

        ModelDesc {
            name: self.name.clone(),
            desc: self.desc.clone(),
            layers,
        }
    }

    /// Generates a model with random connection weights and a zero bias weight.
    ///
    /// # Arguments
    /// * `name` - The model's name.
    /// * `desc` - The model's description.
    /// * `input_width` - The width of the input vector, that is, the fan-in of the first layer.
    /// * `layer_widths` - The amount of units of each layer.
    /// * `act_fns` - The activation functions of the layers.
    /// * `random_range` - The closed interval connection weights are drawn from.
    /// * `rng` - A random number generator.
    ///
    /// # Errors
    /// `NetErr::ShapeMismatch` if there are per layer activation functions and their count
    /// doesn't match the amount of layers, `NetErr::Random` if the range is invalid or the
    /// weights run out.
    pub fn generate<R: Rng>(
        name: &str,
        desc: &str,
        input_width: usize,
        layer_widths: &[usize],
        act_fns: &LayerActFns,
        random_range: (f64, f64),
        rng: &mut R,
    ) -> Result<Self> {
        if let LayerActFns::PerLayer(act_fns) = act_fns {
            if act_fns.len() != layer_widths.len() {
                return Err(NetErr::ShapeMismatch {
                    what: "layer activation functions",
                    got: act_fns.len(),
                    expected: layer_widths.len(),
                });
            }
        }

        let fan_ins = std::iter::once(input_width).chain(layer_widths.iter().copied());
        let limit = fan_ins
            .clone()
            .zip(layer_widths)
            .map(|(fan_in, width)| fan_in * width)
            .sum();

        let (low, high) = random_range;
        let mut weight_gen = RandWeightGen::uniform_inclusive(rng, limit, low, high)?;

        let mut model = Self {
            name: name.to_string(),
            desc: desc.to_string(),
            ..Self::default()
        };

        for (i, (fan_in, &width)) in fan_ins.zip(layer_widths).enumerate() {
            let act_fn = match act_fns {
                LayerActFns::Shared(act_fn) => act_fn,
                LayerActFns::PerLayer(act_fns) => &act_fns[i],
            };

            let units = (0..width)
                .map(|_| {
                    let mut weights = Vec::with_capacity(fan_in + 1);
                    weights.push(0.);
                    let sampled = weight_gen
                        .sample(fan_in)
                        .ok_or_else(|| NetErr::Random("weight generator exhausted".to_string()))?;
                    weights.extend(sampled);
                    Unit::new(weights, Arc::clone(act_fn))
                })
                .collect::<Result<Vec<_>>>()?;

            model.push_layer(units)?;
        }

        info!(
            name = name, layers = model.layers.len(), units = model.units.len();
            "model generated"
        );

        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// Returns the units of the `i`-th layer, in order.
    pub fn layer(&self, i: usize) -> impl Iterator<Item = &Unit> {
        self.layers
            .get(i)
            .into_iter()
            .flatten()
            .map(|&id| &self.units[id])
    }

    /// Returns the ids of the units of the `i`-th layer, in order.
    pub fn layer_ids(&self, i: usize) -> &[UnitId] {
        self.layers.get(i).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the ids of the units attached to `id`, in attachment order.
    pub fn upstream(&self, id: UnitId) -> &[UnitId] {
        &self.upstream[id]
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id]
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id]
    }

    /// The width of the input vector, `None` if the model has no layers.
    pub fn input_width(&self) -> Option<usize> {
        let &first = self.layers.first()?.first()?;
        Some(self.units[first].fan_in())
    }

    /// The width of the output vector, zero if the model has no layers.
    pub fn output_width(&self) -> usize {
        self.layers.last().map_or(0, Vec::len)
    }

    /// Makes a forward pass through the network.
    ///
    /// Every unit of the first layer reads `inputs`. Each following layer reads the outputs
    /// of its upstream units, gathered in attachment order once the previous layer is done.
    ///
    /// # Arguments
    /// * `inputs` - The input vector.
    ///
    /// # Returns
    /// The outputs of the last layer's units, in order.
    ///
    /// # Errors
    /// `NetErr::EmptyModel` if there are no layers, `NetErr::ShapeMismatch` if `inputs`
    /// doesn't fit the first layer.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        let expected = self.input_width().ok_or(NetErr::EmptyModel)?;
        if inputs.len() != expected {
            return Err(NetErr::ShapeMismatch {
                what: "model inputs",
                got: inputs.len(),
                expected,
            });
        }

        let mut outputs = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            outputs.clear();

            for &id in layer {
                let output = if i == 0 {
                    self.units[id].activate(Some(inputs))?
                } else {
                    let gathered = self.upstream[id]
                        .iter()
                        .map(|&up| self.units[up].output().ok_or(NetErr::NotActivated))
                        .collect::<Result<Vec<_>>>()?;

                    self.units[id].activate(Some(&gathered))?
                };

                outputs.push(output);
            }
        }

        trace!(outputs:? = &outputs; "forward pass done");
        Ok(outputs)
    }

    /// Appends a layer, attaching every unit of the current last layer to each of its units.
    fn push_layer(&mut self, units: Vec<Unit>) -> Result<()> {
        let expected = match self.layers.last() {
            Some(prev) => Some(prev.len()),
            None => units.first().map(Unit::fan_in),
        };

        if let Some(expected) = expected {
            if let Some(unit) = units.iter().find(|u| u.fan_in() != expected) {
                return Err(NetErr::ShapeMismatch {
                    what: "unit fan-in",
                    got: unit.fan_in(),
                    expected,
                });
            }
        }

        let start = self.units.len();
        let ids: Vec<UnitId> = (start..start + units.len()).collect();
        self.units.extend(units);
        self.upstream.resize(self.units.len(), Vec::new());

        if let Some(prev) = self.layers.last().cloned() {
            for &from in &prev {
                for &to in &ids {
                    self.attach(from, to);
                }
            }
        }

        self.layers.push(ids);
        Ok(())
    }

    fn attach(&mut self, from: UnitId, to: UnitId) {
        self.upstream[to].push(from);
    }
}
