use std::num::NonZeroUsize;

use log::info;
use synapses::{
    arch::{ModelBuilder, widths},
    dataset::Dataset,
    specs::{ActFnAssignment, ActFnDesc, GenerateSpec, TrainerSpec},
    training::Trainer,
};

const XOR2: [f64; 12] = [
    0., 0., 0., //
    0., 1., 1., //
    1., 0., 1., //
    1., 1., 0., //
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Wider than 2-2-1 so that most seeds separate the classes
    let spec = GenerateSpec {
        name: "xor".to_string(),
        desc: "Compute Exclusive Or Operation on 2 inputs.".to_string(),
        input_width: NonZeroUsize::new(2).ok_or_else(|| anyhow::anyhow!("zero input width"))?,
        layer_widths: widths(&[8, 1]).ok_or_else(|| anyhow::anyhow!("zero layer width"))?,
        act_fns: ActFnAssignment::Shared(ActFnDesc::new("Logistic")),
        random_range: (-0.5, 0.5),
        seed: Some(7),
    };

    let model = ModelBuilder::new().build(&spec)?;

    let trainer_spec = TrainerSpec {
        learning_rate: 1.,
        epochs: NonZeroUsize::new(5000).ok_or_else(|| anyhow::anyhow!("zero epochs"))?,
        seed: Some(7),
    };

    let mut trainer = Trainer::from_spec(model, &trainer_spec);
    let mut dataset = Dataset::new(XOR2.into(), 2, 1)?;

    let losses = trainer.train(&mut dataset)?;
    if let (Some(first), Some(last)) = (losses.first(), losses.last()) {
        info!("loss went from {first:.6} to {last:.6}");
    }

    for x in [[0., 0.], [0., 1.], [1., 0.], [1., 1.]] {
        let y = trainer.predict(&x)?;
        info!("{x:?} -> {:.4}", y[0]);
    }

    let desc = trainer.into_model().describe().to_value()?;
    info!("trained model: {desc}");

    Ok(())
}
