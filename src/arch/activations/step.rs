/// A binary step: fires `1` strictly above its threshold, `0` otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Step {
    threshold: f64,
}

impl Step {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn f(&self, x: f64) -> f64 {
        if x > self.threshold { 1. } else { 0. }
    }

    pub fn df(&self, _actual: f64) -> f64 {
        0.
    }
}
