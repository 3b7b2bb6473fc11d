use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::uniform::Error as UniformError;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, NetErr>;

/// The network's error type.
#[derive(Debug)]
pub enum NetErr {
    /// A weight vector, input vector or layer width disagrees with the expected fan-in.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A unit was activated with an empty pending buffer and no external inputs.
    MissingInput,
    /// The activation function has no derivative.
    UnsupportedDerivative { act_fn: &'static str },
    /// The activation descriptor carries a tag that names no known activation function.
    UnknownActFn(String),
    /// The activation descriptor carries a parameter the activation function does not take.
    InvalidParam { act_fn: &'static str, param: String },
    /// The model has no layers.
    EmptyModel,
    /// A unit's output was requested before it was ever activated.
    NotActivated,
    /// The random weight range is invalid.
    Random(String),
    Json(serde_json::Error),
}

impl Display for NetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
            NetErr::MissingInput => write!(f, "unit was activated without any input"),
            NetErr::UnsupportedDerivative { act_fn } => {
                write!(f, "the {act_fn} activation function has no derivative")
            }
            NetErr::UnknownActFn(kind) => write!(f, "unknown activation function kind {kind:?}"),
            NetErr::InvalidParam { act_fn, param } => {
                write!(f, "the {act_fn} activation function takes no parameter {param:?}")
            }
            NetErr::EmptyModel => write!(f, "the model has no layers"),
            NetErr::NotActivated => write!(f, "unit output requested before activation"),
            NetErr::Random(msg) => write!(f, "invalid random weight range: {msg}"),
            NetErr::Json(e) => write!(f, "description conversion failed: {e}"),
        }
    }
}

impl Error for NetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UniformError> for NetErr {
    fn from(value: UniformError) -> Self {
        Self::Random(value.to_string())
    }
}

impl From<serde_json::Error> for NetErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
