use std::collections::BTreeMap;

use super::{Logistic, Step};
use crate::{NetErr, Result, specs::ActFnDesc};

const STEP: &str = "Step";
const PASS: &str = "Pass";
const LOGISTIC: &str = "Logistic";

/// An activation function. Immutable once built, so a single instance can be
/// shared by any number of units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActFn {
    Step(Step),
    /// The identity. Has no derivative, so it cannot be trained through.
    Pass,
    Logistic(Logistic),
}

impl ActFn {
    pub fn step(threshold: f64) -> Self {
        Self::Step(Step::new(threshold))
    }

    pub fn pass() -> Self {
        Self::Pass
    }

    pub fn logistic() -> Self {
        Self::Logistic(Logistic)
    }

    /// Returns the name of this activation function's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Step(_) => STEP,
            Self::Pass => PASS,
            Self::Logistic(_) => LOGISTIC,
        }
    }

    /// Evaluates the activation function.
    pub fn f(&self, x: f64) -> f64 {
        match self {
            Self::Step(a) => a.f(x),
            Self::Pass => x,
            Self::Logistic(a) => a.f(x),
        }
    }

    /// Evaluates the derivative of the activation function given the output it produced.
    ///
    /// # Errors
    /// `NetErr::UnsupportedDerivative` for `Pass`.
    pub fn df(&self, actual: f64) -> Result<f64> {
        match self {
            Self::Step(a) => Ok(a.df(actual)),
            Self::Pass => Err(NetErr::UnsupportedDerivative { act_fn: PASS }),
            Self::Logistic(a) => Ok(a.df(actual)),
        }
    }

    /// Describes this activation function so it can be rebuilt with `from_desc`.
    pub fn describe(&self) -> ActFnDesc {
        match self {
            Self::Step(a) => ActFnDesc::new(STEP).with_param("threshold", a.threshold()),
            Self::Pass | Self::Logistic(_) => ActFnDesc::new(self.kind()),
        }
    }

    /// Rebuilds an activation function from its description.
    ///
    /// # Arguments
    /// * `desc` - The description of the activation function.
    ///
    /// # Errors
    /// `NetErr::UnknownActFn` if the tag names no activation function and
    /// `NetErr::InvalidParam` if a parameter is not taken by it.
    pub fn from_desc(desc: &ActFnDesc) -> Result<Self> {
        let empty = BTreeMap::new();
        let params = desc.p.as_ref().unwrap_or(&empty);

        match desc.e.as_str() {
            STEP => {
                let mut threshold = 0.;
                for (name, &value) in params {
                    match name.as_str() {
                        "threshold" => threshold = value,
                        _ => return Err(invalid_param(STEP, name)),
                    }
                }

                Ok(Self::step(threshold))
            }
            PASS => no_params(PASS, params).map(|_| Self::pass()),
            LOGISTIC => no_params(LOGISTIC, params).map(|_| Self::logistic()),
            other => Err(NetErr::UnknownActFn(other.to_string())),
        }
    }
}

fn invalid_param(act_fn: &'static str, param: &str) -> NetErr {
    NetErr::InvalidParam {
        act_fn,
        param: param.to_string(),
    }
}

fn no_params(act_fn: &'static str, params: &BTreeMap<String, f64>) -> Result<()> {
    match params.keys().next() {
        Some(name) => Err(invalid_param(act_fn, name)),
        None => Ok(()),
    }
}
