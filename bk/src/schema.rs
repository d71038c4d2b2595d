//! Parameter schema: the declared shape of a block's configuration.
//!
//! A schema lists every configurable parameter with its type, value
//! domain and default. Authoring mistakes (a default outside its own
//! domain, an empty select domain, a duplicate name) are rejected when
//! the schema is constructed, never at resolution time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::ParamValue;

/// Errors raised while loading a schema or preset table.
///
/// All of these are authoring defects and fail fast at load time.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate parameter declaration: {param}")]
    DuplicateParam { param: String },

    #[error("Select parameter '{param}' declares an empty value set")]
    EmptySelectDomain { param: String },

    #[error("Default for parameter '{param}' is outside its declared domain: {default}")]
    DefaultOutOfDomain { param: String, default: ParamValue },

    #[error("Preset '{preset}' sets undeclared parameter '{param}'")]
    UnknownPresetParam { preset: String, param: String },

    #[error("Preset '{preset}' sets parameter '{param}' outside its domain: {value}")]
    PresetValueOutOfDomain {
        preset: String,
        param: String,
        value: ParamValue,
    },
}

/// Parameter type and value domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamKind {
    /// One of a fixed set of string values
    Select { values: Vec<String> },
    /// A number within an inclusive range
    Number { min: f64, max: f64 },
    /// A boolean flag
    Boolean,
    /// Free text, no domain
    Text,
}

impl ParamKind {
    /// Short domain description for display (`select[grid, list]`,
    /// `number[1, 4]`, ...).
    pub fn describe(&self) -> String {
        match self {
            Self::Select { values } => format!("select[{}]", values.join(", ")),
            Self::Number { min, max } => format!("number[{}, {}]", min, max),
            Self::Boolean => "boolean".to_string(),
            Self::Text => "text".to_string(),
        }
    }
}

/// One declared parameter: name, type/domain and default value.
///
/// In YAML block definitions the name is the map key, so it is filled in
/// after deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(default, skip_deserializing)]
    pub name: String,

    #[serde(flatten)]
    pub kind: ParamKind,

    pub default: ParamValue,
}

impl ParamSpec {
    pub fn select(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Select {
                values: values.into_iter().map(Into::into).collect(),
            },
            default: ParamValue::Text(default.into()),
        }
    }

    pub fn number(name: impl Into<String>, min: f64, max: f64, default: f64) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Number { min, max },
            default: ParamValue::Number(default),
        }
    }

    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Boolean,
            default: ParamValue::Bool(default),
        }
    }

    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Text,
            default: ParamValue::Text(default.into()),
        }
    }

    /// True iff `value` satisfies this parameter's domain.
    pub fn validate(&self, value: &ParamValue) -> bool {
        match &self.kind {
            ParamKind::Select { values } => value
                .as_str()
                .map(|s| values.iter().any(|v| v == s))
                .unwrap_or(false),
            ParamKind::Number { min, max } => value
                .as_number()
                .map(|n| *min <= n && n <= *max)
                .unwrap_or(false),
            ParamKind::Boolean => value.as_bool().is_some(),
            // Text has no domain, any value is acceptable
            ParamKind::Text => true,
        }
    }
}

/// The full set of declared parameters for one block type.
///
/// Read-only after construction; `new` performs all authoring checks.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ParamSchema {
    specs: Vec<ParamSpec>,
}

impl ParamSchema {
    pub fn new(specs: Vec<ParamSpec>) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.clone()) {
                return Err(SchemaError::DuplicateParam {
                    param: spec.name.clone(),
                });
            }
            if let ParamKind::Select { values } = &spec.kind {
                if values.is_empty() {
                    return Err(SchemaError::EmptySelectDomain {
                        param: spec.name.clone(),
                    });
                }
            }
            if !spec.validate(&spec.default) {
                return Err(SchemaError::DefaultOutOfDomain {
                    param: spec.name.clone(),
                    default: spec.default.clone(),
                });
            }
        }
        Ok(Self { specs })
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
