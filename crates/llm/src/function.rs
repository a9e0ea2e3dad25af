//! Function calling abstractions

use compact_str::CompactString;
use schemars::Schema;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

/// A function the model may call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Function {
    /// The name of the function
    pub name: CompactString,

    /// The description of the function
    pub description: String,

    /// The parameters of the function
    pub parameters: Schema,
}

/// A function call requested by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FunctionCall {
    /// The name of the function to call
    pub name: CompactString,

    /// The arguments to pass to the function (JSON string)
    #[serde(default)]
    pub arguments: String,
}

/// Controls whether and which function is called by the model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FunctionCallPolicy {
    /// Model will not call any function
    None,

    /// Model picks between answering and calling a function
    #[default]
    Auto,

    /// Model must call the named function
    Named(CompactString),
}

impl Serialize for FunctionCallPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_str("none"),
            Self::Auto => serializer.serialize_str("auto"),
            Self::Named(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("name", name)?;
                map.end()
            }
        }
    }
}

impl From<&str> for FunctionCallPolicy {
    fn from(value: &str) -> Self {
        FunctionCallPolicy::Named(value.into())
    }
}
