//! Preset table: named shorthand bundles of settings values.
//!
//! Presets are validated against their schema when the table is built;
//! a preset naming an undeclared parameter or carrying an out-of-domain
//! value is an authoring defect and fails fast.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::{ParamSchema, SchemaError};
use crate::value::ParamValue;

/// A named bundle of parameter values. May be partial; unset parameters
/// fall back to schema defaults at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetSpec {
    pub name: String,
    pub settings: BTreeMap<String, ParamValue>,
}

impl PresetSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: BTreeMap::new(),
        }
    }

    /// Builder-style setter, mainly for programmatic construction.
    pub fn set(mut self, param: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.settings.insert(param.into(), value.into());
        self
    }
}

/// All presets declared for one block type, keyed by name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PresetTable {
    presets: BTreeMap<String, PresetSpec>,
}

impl PresetTable {
    /// Build a table, validating every preset against `schema`.
    pub fn new(presets: Vec<PresetSpec>, schema: &ParamSchema) -> Result<Self, SchemaError> {
        let mut map = BTreeMap::new();
        for preset in presets {
            for (param, value) in &preset.settings {
                let spec = schema
                    .get(param)
                    .ok_or_else(|| SchemaError::UnknownPresetParam {
                        preset: preset.name.clone(),
                        param: param.clone(),
                    })?;
                if !spec.validate(value) {
                    return Err(SchemaError::PresetValueOutOfDomain {
                        preset: preset.name.clone(),
                        param: param.clone(),
                        value: value.clone(),
                    });
                }
            }
            map.insert(preset.name.clone(), preset);
        }
        Ok(Self { presets: map })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a preset by name. Not-found is not fatal; callers fall
    /// back to schema defaults.
    pub fn lookup(&self, name: &str) -> Option<&PresetSpec> {
        self.presets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetSpec> {
        self.presets.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
