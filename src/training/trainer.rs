use std::num::NonZeroUsize;

use log::{debug, trace};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    NetErr, Result,
    arch::{Model, UnitId},
    dataset::Dataset,
    specs::TrainerSpec,
};

/// Trains a `Model` by backpropagation of the squared error, one sample per weight update.
#[derive(Debug)]
pub struct Trainer {
    model: Model,
    learning_rate: f64,
    epochs: NonZeroUsize,
    rng: StdRng,
}

impl Trainer {
    /// Returns a new `Trainer` that runs a single epoch per `train` call.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `learning_rate` - The *length* of the steps taken on each weight update.
    pub fn new(model: Model, learning_rate: f64) -> Self {
        Self {
            model,
            learning_rate,
            epochs: NonZeroUsize::MIN,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Returns a new `Trainer` following a spec.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `spec` - The specification for the trainer.
    pub fn from_spec(model: Model, spec: &TrainerSpec) -> Self {
        let rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            model,
            learning_rate: spec.learning_rate,
            epochs: spec.epochs,
            rng,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Makes a forward pass through the trained model.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.model.predict(inputs)
    }

    /// Runs one step of backpropagation over a single sample.
    ///
    /// Every new weight is computed from the weights the forward pass used, and they are all
    /// committed at the end. If anything fails, no weight is changed. Bias weights are never
    /// trained.
    ///
    /// # Arguments
    /// * `inputs` - The sample's inputs.
    /// * `ideals` - The outputs the model should have produced.
    ///
    /// # Returns
    /// The total error `sum(0.5 * (ideal - actual)^2)` of the forward pass, before the update.
    pub fn fit(&mut self, inputs: &[f64], ideals: &[f64]) -> Result<f64> {
        let expected = self.model.output_width();
        if ideals.len() != expected {
            return Err(NetErr::ShapeMismatch {
                what: "ideal outputs",
                got: ideals.len(),
                expected,
            });
        }

        let actual = self.model.predict(inputs)?;
        let total_error: f64 = ideals
            .iter()
            .zip(&actual)
            .map(|(ideal, actual)| 0.5 * (ideal - actual).powi(2))
            .sum();

        let staged = self.backprop(ideals)?;
        for (id, weights) in staged {
            self.model.unit_mut(id).update_weights(&weights)?;
        }

        debug!(total_error = total_error; "fit done");
        Ok(total_error)
    }

    /// Walks the layers from the output to the input computing the error term of each unit
    /// and its new connection weights.
    ///
    /// # Returns
    /// The new connection weights of every unit, not yet applied.
    fn backprop(&self, ideals: &[f64]) -> Result<Vec<(UnitId, Vec<f64>)>> {
        let model = &self.model;
        let lr = self.learning_rate;
        let nlayers = model.num_layers();

        // Error terms sent backwards, summed per receiving unit
        let mut received = vec![0.; model.num_units()];
        let mut staged = Vec::new();

        for i in (0..nlayers).rev() {
            let ids = model.layer_ids(i);

            for (j, &id) in ids.iter().enumerate() {
                let unit = model.unit(id);
                let output = unit.output().ok_or(NetErr::NotActivated)?;

                let partial_error = if i + 1 == nlayers {
                    output - ideals[j]
                } else {
                    received[id]
                };

                let delta = partial_error * unit.act_fn().df(output)?;

                let weights: Vec<f64> = unit
                    .weights()
                    .iter()
                    .zip(unit.last_inputs())
                    .map(|(w, x)| w - lr * delta * x)
                    .collect();

                if i > 0 {
                    for (&up, w) in model.upstream(id).iter().zip(unit.weights()) {
                        received[up] += delta * w;
                    }
                }

                staged.push((id, weights));
            }

            trace!(layer = i; "error terms computed");
        }

        Ok(staged)
    }

    /// Fits every sample of `dataset` once, in its current order.
    ///
    /// # Returns
    /// The mean total error over the samples.
    pub fn train_epoch(&mut self, dataset: &Dataset) -> Result<f64> {
        let mut loss = 0.;
        for (x, y) in dataset.samples() {
            loss += self.fit(x, y)?;
        }

        Ok(loss / dataset.len().max(1) as f64)
    }

    /// Performs this trainer's epochs over `dataset`, shuffling it before each one.
    ///
    /// # Returns
    /// The loss of each epoch.
    pub fn train(&mut self, dataset: &mut Dataset) -> Result<Vec<f64>> {
        let epochs = self.epochs.get();
        let mut losses = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            dataset.shuffle(&mut self.rng);
            let loss = self.train_epoch(dataset)?;
            debug!(epoch = epoch, loss = loss; "epoch finished");
            losses.push(loss);
        }

        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        arch::{Unit, activations::ActFn},
        specs::{ActFnDesc, ModelDesc, UnitDesc},
    };

    fn unit_desc(w: &[f64], kind: &str) -> UnitDesc {
        UnitDesc {
            w: w.to_vec(),
            a: ActFnDesc::new(kind),
        }
    }

    fn single_unit(w: &[f64], kind: &str) -> Model {
        Model::from_desc(&ModelDesc {
            name: "single".to_string(),
            desc: String::new(),
            layers: vec![vec![unit_desc(w, kind)]],
        })
        .unwrap()
    }

    fn weights(model: &Model) -> Vec<Vec<f64>> {
        (0..model.num_layers())
            .flat_map(|i| model.layer(i).map(|u| u.describe().w).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn single_layer_update() {
        let mut trainer = Trainer::new(single_unit(&[0.5, 0.2, -0.4], "Logistic"), 0.5);
        let x = [1., 2.];

        let output = Unit::new(vec![0.5, 0.2, -0.4], Arc::new(ActFn::logistic()))
            .unwrap()
            .activate(Some(&x))
            .unwrap();
        let delta = (output - 1.) * output * (1. - output);

        let total_error = trainer.fit(&x, &[1.]).unwrap();
        assert_relative_eq!(total_error, 0.5 * (1. - output).powi(2));

        let unit = trainer.model().layer(0).next().unwrap();
        assert_eq!(unit.bias(), 0.5);
        assert_relative_eq!(unit.weights()[0], 0.2 - 0.5 * delta * 1.);
        assert_relative_eq!(unit.weights()[1], -0.4 - 0.5 * delta * 2.);
    }

    #[test]
    fn step_does_not_learn() {
        let mut trainer = Trainer::new(single_unit(&[0., 1., 1.], "Step"), 1.);
        let before = weights(trainer.model());

        let total_error = trainer.fit(&[1., 1.], &[0.]).unwrap();
        assert_eq!(total_error, 0.5);
        assert_eq!(weights(trainer.model()), before);
    }

    #[test]
    fn pass_fails_without_updating() {
        let model = Model::from_desc(&ModelDesc {
            name: "mixed".to_string(),
            desc: String::new(),
            layers: vec![
                vec![unit_desc(&[0., 0.3], "Pass")],
                vec![unit_desc(&[0., 0.7], "Logistic")],
            ],
        })
        .unwrap();

        let mut trainer = Trainer::new(model, 1.);
        let before = weights(trainer.model());

        let err = trainer.fit(&[1.], &[1.]).unwrap_err();
        assert!(matches!(err, NetErr::UnsupportedDerivative { act_fn: "Pass" }));
        assert_eq!(weights(trainer.model()), before);
    }

    #[test]
    fn wrong_ideal_width() {
        let mut trainer = Trainer::new(single_unit(&[0., 1.], "Logistic"), 1.);
        let err = trainer.fit(&[1.], &[1., 0.]).unwrap_err();

        assert!(matches!(
            err,
            NetErr::ShapeMismatch {
                got: 2,
                expected: 1,
                ..
            }
        ));
    }

    #[test]
    fn wrong_input_width() {
        let mut trainer = Trainer::new(single_unit(&[0., 1.], "Logistic"), 1.);
        let before = weights(trainer.model());

        assert!(trainer.fit(&[1., 1.], &[1.]).is_err());
        assert_eq!(weights(trainer.model()), before);
    }

    #[test]
    fn hidden_unit_sums_received_terms() {
        // One hidden unit feeding two outputs
        let model = Model::from_desc(&ModelDesc {
            name: "fan-out".to_string(),
            desc: String::new(),
            layers: vec![
                vec![unit_desc(&[0.1, 0.4], "Logistic")],
                vec![
                    unit_desc(&[0.2, 0.5], "Logistic"),
                    unit_desc(&[0.3, -0.6], "Logistic"),
                ],
            ],
        })
        .unwrap();

        let mut trainer = Trainer::new(model, 0.5);
        let x = 0.8;
        let ideals = [0.1, 0.9];

        let h = sigmoid(0.1 + 0.4 * x);
        let o1 = sigmoid(0.2 + 0.5 * h);
        let o2 = sigmoid(0.3 - 0.6 * h);
        let d1 = (o1 - ideals[0]) * o1 * (1. - o1);
        let d2 = (o2 - ideals[1]) * o2 * (1. - o2);
        let dh = (d1 * 0.5 + d2 * -0.6) * h * (1. - h);

        trainer.fit(&[x], &ideals).unwrap();
        let model = trainer.model();

        let hidden = model.layer(0).next().unwrap();
        assert_relative_eq!(hidden.weights()[0], 0.4 - 0.5 * dh * x, epsilon = 1e-12);

        let outputs: Vec<_> = model.layer(1).collect();
        assert_relative_eq!(outputs[0].weights()[0], 0.5 - 0.5 * d1 * h, epsilon = 1e-12);
        assert_relative_eq!(outputs[1].weights()[0], -0.6 - 0.5 * d2 * h, epsilon = 1e-12);
    }

    #[test]
    fn error_terms_flow_through_two_hidden_layers() {
        let model = Model::from_desc(&ModelDesc {
            name: "deep".to_string(),
            desc: String::new(),
            layers: vec![
                vec![unit_desc(&[0.1, 0.4], "Logistic")],
                vec![
                    unit_desc(&[0.2, 0.5], "Logistic"),
                    unit_desc(&[-0.1, 0.3], "Logistic"),
                ],
                vec![unit_desc(&[0.05, 0.6, -0.7], "Logistic")],
            ],
        })
        .unwrap();

        let mut trainer = Trainer::new(model, 0.5);
        let x = 0.8;
        let ideal = 0.9;

        let h = sigmoid(0.1 + 0.4 * x);
        let g1 = sigmoid(0.2 + 0.5 * h);
        let g2 = sigmoid(-0.1 + 0.3 * h);
        let o = sigmoid(0.05 + 0.6 * g1 - 0.7 * g2);

        let d_o = (o - ideal) * o * (1. - o);
        let d_g1 = d_o * 0.6 * g1 * (1. - g1);
        let d_g2 = d_o * -0.7 * g2 * (1. - g2);
        let d_h = (d_g1 * 0.5 + d_g2 * 0.3) * h * (1. - h);

        let total_error = trainer.fit(&[x], &[ideal]).unwrap();
        assert_relative_eq!(total_error, 0.5 * (ideal - o).powi(2), epsilon = 1e-12);

        let model = trainer.model();

        let output = model.layer(2).next().unwrap();
        assert_relative_eq!(output.weights()[0], 0.6 - 0.5 * d_o * g1, epsilon = 1e-12);
        assert_relative_eq!(output.weights()[1], -0.7 - 0.5 * d_o * g2, epsilon = 1e-12);

        let middle: Vec<_> = model.layer(1).collect();
        assert_relative_eq!(middle[0].weights()[0], 0.5 - 0.5 * d_g1 * h, epsilon = 1e-12);
        assert_relative_eq!(middle[1].weights()[0], 0.3 - 0.5 * d_g2 * h, epsilon = 1e-12);

        let first = model.layer(0).next().unwrap();
        assert_relative_eq!(first.weights()[0], 0.4 - 0.5 * d_h * x, epsilon = 1e-12);
        assert_ne!(first.weights()[0], 0.4);
    }

    fn sigmoid(x: f64) -> f64 {
        ActFn::logistic().f(x)
    }

    #[test]
    fn from_spec() {
        let spec = TrainerSpec {
            learning_rate: 0.25,
            epochs: NonZeroUsize::new(3).unwrap(),
            seed: Some(5),
        };
        let mut trainer = Trainer::from_spec(single_unit(&[0., 1., 1.], "Logistic"), &spec);
        let mut dataset = Dataset::new(vec![0., 0., 0., 1., 1., 1.], 2, 1).unwrap();

        assert_eq!(trainer.learning_rate(), 0.25);
        assert_eq!(trainer.train(&mut dataset).unwrap().len(), 3);
    }
}
