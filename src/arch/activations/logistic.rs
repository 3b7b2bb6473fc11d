use std::f64::consts::E;

/// The logistic sigmoid `1 / (1 + e^-x)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Logistic;

impl Logistic {
    pub fn f(&self, x: f64) -> f64 {
        1. / (1. + E.powf(-x))
    }

    /// Derivative expressed in terms of the already computed output `a = f(x)`.
    pub fn df(&self, actual: f64) -> f64 {
        actual * (1. - actual)
    }
}
