use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// The description of an activation function.
///
/// The kind is kept as a plain tag so that rejecting unknown kinds is up to
/// `ActFn::from_desc`, not to the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActFnDesc {
    /// The kind of activation function (`Step`, `Pass` or `Logistic`).
    pub e: String,
    /// Named parameters of the activation function, if it takes any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<BTreeMap<String, f64>>,
}

impl ActFnDesc {
    /// Creates a new `ActFnDesc` without parameters.
    ///
    /// # Arguments
    /// * `kind` - The activation function's tag.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            e: kind.into(),
            p: None,
        }
    }

    /// Adds a named parameter to this description.
    ///
    /// # Arguments
    /// * `name` - The parameter's name.
    /// * `value` - The parameter's value.
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.p.get_or_insert_with(BTreeMap::new).insert(name.into(), value);
        self
    }
}

/// The description of a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDesc {
    /// The full weight vector, index 0 is the bias weight.
    pub w: Vec<f64>,
    /// The unit's activation function.
    pub a: ActFnDesc,
}

/// A layer is described by its units, in order.
pub type LayerDesc = Vec<UnitDesc>;

/// The description of a whole model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDesc {
    pub name: String,
    pub desc: String,
    pub layers: Vec<LayerDesc>,
}

impl ModelDesc {
    /// Converts this description into an in-memory nested mapping.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Reads a description back from an in-memory nested mapping.
    ///
    /// # Errors
    /// A missing key or a value of the wrong type.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
