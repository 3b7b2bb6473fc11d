mod act_fn;
mod logistic;
mod step;

pub use act_fn::ActFn;
pub use logistic::Logistic;
pub use step::Step;
