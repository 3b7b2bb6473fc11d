use approx::assert_relative_eq;
use serde_json::json;
use synapses::{
    NetErr,
    arch::{Model, ModelBuilder},
    dataset::Dataset,
    specs::{GenerateSpec, ModelDesc, TrainerSpec},
    training::Trainer,
};

fn xor_value() -> serde_json::Value {
    json!({
        "name": "xor",
        "desc": "Compute Exclusive Or Operation on 2 inputs.",
        "layers": [
            [
                { "w": [1, -0.5, -0.5], "a": { "e": "Step", "p": { "threshold": 0 } } },
                { "w": [0, 0.25, 0.25], "a": { "e": "Step" } }
            ],
            [
                { "w": [-0.25, 0.25, 0.25], "a": { "e": "Step", "p": { "threshold": 0 } } }
            ]
        ]
    })
}

#[test]
fn xor_from_value() {
    let desc = ModelDesc::from_value(xor_value()).unwrap();
    let mut model = Model::from_desc(&desc).unwrap();

    assert_eq!(model.name(), "xor");
    assert_eq!(model.num_layers(), 2);
    assert_eq!(model.predict(&[1., 1.]).unwrap(), [0.]);
    assert_eq!(model.predict(&[1., 0.]).unwrap(), [1.]);
    assert_eq!(model.predict(&[0., 1.]).unwrap(), [1.]);
    assert_eq!(model.predict(&[0., 0.]).unwrap(), [0.]);
}

#[test]
fn value_round_trip() {
    let model = Model::from_desc(&ModelDesc::from_value(xor_value()).unwrap()).unwrap();

    let value = model.describe().to_value().unwrap();
    let again = Model::from_desc(&ModelDesc::from_value(value.clone()).unwrap()).unwrap();

    assert_eq!(again.describe().to_value().unwrap(), value);
    // The threshold is always written, even when it was left out
    assert_eq!(value["layers"][0][1]["a"]["p"]["threshold"], json!(0.0));
}

#[test]
fn unknown_act_fn_is_rejected() {
    let mut value = xor_value();
    value["layers"][1][0]["a"]["e"] = json!("ReLU");

    let desc = ModelDesc::from_value(value).unwrap();
    let err = Model::from_desc(&desc).unwrap_err();

    assert!(matches!(err, NetErr::UnknownActFn(ref kind) if kind == "ReLU"));
}

#[test]
fn unknown_param_is_rejected() {
    let mut value = xor_value();
    value["layers"][0][0]["a"]["p"] = json!({ "slope": 2 });

    let desc = ModelDesc::from_value(value).unwrap();
    let err = Model::from_desc(&desc).unwrap_err();

    assert!(matches!(err, NetErr::InvalidParam { act_fn: "Step", .. }));
}

#[test]
fn misaligned_layers_are_rejected() {
    let mut value = xor_value();
    value["layers"][1][0]["w"] = json!([0, 1, 1, 1]);

    let desc = ModelDesc::from_value(value).unwrap();
    let err = Model::from_desc(&desc).unwrap_err();

    assert!(matches!(err, NetErr::ShapeMismatch { got: 3, expected: 2, .. }));
}

#[test]
fn reconstruct_replaces_everything() {
    let mut model = Model::from_desc(&ModelDesc::from_value(xor_value()).unwrap()).unwrap();

    let and = json!({
        "name": "and",
        "desc": "",
        "layers": [[{ "w": [-0.25, 0.25, 0.25], "a": { "e": "Step" } }]]
    });
    model.reconstruct(&ModelDesc::from_value(and).unwrap()).unwrap();

    assert_eq!(model.name(), "and");
    assert_eq!(model.num_layers(), 1);
    assert_eq!(model.predict(&[1., 1.]).unwrap(), [1.]);
    assert_eq!(model.predict(&[1., 0.]).unwrap(), [0.]);
}

#[test]
fn generate_and_train_from_json_specs() {
    let spec: GenerateSpec = serde_json::from_value(json!({
        "name": "and",
        "desc": "Generated and network.",
        "input_width": 2,
        "layer_widths": [1],
        "act_fns": { "e": "Logistic" },
        "random_range": [-0.5, 0.5],
        "seed": 42
    }))
    .unwrap();

    let model = ModelBuilder::new().build(&spec).unwrap();
    let generated = model.describe();
    assert_eq!(generated.layers[0][0].w.len(), 3);
    assert_eq!(generated.layers[0][0].w[0], 0.);

    let trainer_spec: TrainerSpec = serde_json::from_value(json!({
        "learning_rate": 0.5,
        "epochs": 50,
        "seed": 42
    }))
    .unwrap();

    let mut trainer = Trainer::from_spec(model, &trainer_spec);
    let and2 = vec![
        0., 0., 0., //
        0., 1., 0., //
        1., 0., 0., //
        1., 1., 1., //
    ];
    let mut dataset = Dataset::new(and2, 2, 1).unwrap();

    let losses = trainer.train(&mut dataset).unwrap();
    assert_eq!(losses.len(), 50);
    assert!(losses.iter().all(|l| l.is_finite()));

    let trained = trainer.into_model().describe();
    assert_relative_eq!(trained.layers[0][0].w[0], 0.);
    assert_eq!(trained.name, "and");
}
