//! Block property resolver.
//!
//! Produces a fully-defaulted, domain-valid settings mapping from three
//! ranked sources, in increasing priority:
//!
//! 1. Each declared parameter's schema default
//! 2. The named preset's settings (raw key `preset`)
//! 3. Explicit raw property values
//!
//! Resolution is synchronous and pure: the resolver is read-only after
//! construction and every call builds a fresh [`Resolution`], so
//! concurrent callers need no coordination.
//!
//! Out-of-domain raw values are discarded with a warning and the prior
//! layer's value stands (policy recorded in DESIGN.md); unknown raw keys
//! are ignored so callers may carry forward-compatible extra properties.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::preset::PresetTable;
use crate::schema::ParamSchema;
use crate::value::ParamValue;

/// Caller-supplied property bag. May be partial, may contain unknown
/// keys or out-of-domain values.
pub type RawProperties = BTreeMap<String, ParamValue>;

/// Non-fatal issue encountered while resolving.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveWarning {
    /// The raw bag named a preset that is not in the table.
    UnknownPreset { name: String },
    /// A raw value failed its parameter's domain check and was dropped.
    OutOfDomain { param: String, value: ParamValue },
}

impl std::fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPreset { name } => {
                write!(f, "unknown preset '{}', using schema defaults", name)
            }
            Self::OutOfDomain { param, value } => write!(
                f,
                "value '{}' is outside the domain of '{}', keeping previous value",
                value, param
            ),
        }
    }
}

/// Result of one resolution call: every declared parameter mapped to a
/// domain-valid value, plus any warnings produced along the way.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub settings: BTreeMap<String, ParamValue>,
    pub warnings: Vec<ResolveWarning>,
}

/// Resolves raw block properties against a schema and preset table.
pub struct Resolver {
    schema: ParamSchema,
    presets: PresetTable,
}

impl Resolver {
    /// Reserved raw key selecting a preset.
    pub const PRESET_KEY: &'static str = "preset";

    pub fn new(schema: ParamSchema, presets: PresetTable) -> Self {
        Self { schema, presets }
    }

    pub fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Resolve a raw property bag into settings.
    ///
    /// Every declared parameter is present in the output. Explicit raw
    /// values beat preset values beat defaults.
    pub fn resolve(&self, raw: &RawProperties) -> Resolution {
        let mut settings: BTreeMap<String, ParamValue> = self
            .schema
            .iter()
            .map(|spec| (spec.name.clone(), spec.default.clone()))
            .collect();
        let mut warnings = Vec::new();

        // Preset layer
        if let Some(value) = raw.get(Self::PRESET_KEY) {
            let preset = value.as_str().and_then(|name| self.presets.lookup(name));
            match preset {
                Some(preset) => {
                    debug!(preset = %preset.name, "applying preset");
                    for (param, value) in &preset.settings {
                        settings.insert(param.clone(), value.clone());
                    }
                }
                None => {
                    warn!(preset = %value, "unknown preset, falling back to defaults");
                    warnings.push(ResolveWarning::UnknownPreset {
                        name: value.to_string(),
                    });
                }
            }
        }

        // Explicit raw values
        for (key, value) in raw {
            if key == Self::PRESET_KEY {
                continue;
            }
            let Some(spec) = self.schema.get(key) else {
                // Forward-compatible extra properties are inert
                debug!(%key, "ignoring undeclared property");
                continue;
            };
            if spec.validate(value) {
                settings.insert(key.clone(), value.clone());
            } else {
                warn!(param = %key, value = %value, "discarding out-of-domain value");
                warnings.push(ResolveWarning::OutOfDomain {
                    param: key.clone(),
                    value: value.clone(),
                });
            }
        }

        Resolution { settings, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetSpec;
    use crate::schema::ParamSpec;
    use proptest::prelude::*;

    /// Benefit-grid shaped resolver: layout select[grid,list,carousel]
    /// default grid, columns number[1,4] default 3, preset `featured`
    /// setting {layout: list, columns: 1}.
    fn sample_resolver() -> Resolver {
        let schema = ParamSchema::new(vec![
            ParamSpec::select("layout", ["grid", "list", "carousel"], "grid"),
            ParamSpec::number("columns", 1.0, 4.0, 3.0),
            ParamSpec::boolean("show-icons", true),
            ParamSpec::text("heading", ""),
        ])
        .unwrap();
        let presets = PresetTable::new(
            vec![
                PresetSpec::new("featured").set("layout", "list").set("columns", 1i64),
                PresetSpec::new("compact").set("columns", 4i64).set("show-icons", false),
            ],
            &schema,
        )
        .unwrap();
        Resolver::new(schema, presets)
    }

    fn raw(pairs: &[(&str, ParamValue)]) -> RawProperties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_all_defaults() {
        let resolution = sample_resolver().resolve(&RawProperties::new());

        assert_eq!(resolution.settings.len(), 4);
        assert_eq!(resolution.settings["layout"], "grid".into());
        assert_eq!(resolution.settings["columns"], 3i64.into());
        assert_eq!(resolution.settings["show-icons"], true.into());
        assert_eq!(resolution.settings["heading"], "".into());
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_preset_merges_over_defaults() {
        let resolution = sample_resolver().resolve(&raw(&[("preset", "featured".into())]));

        assert_eq!(resolution.settings["layout"], "list".into());
        assert_eq!(resolution.settings["columns"], 1i64.into());
        // Unset by the preset, so schema defaults stand
        assert_eq!(resolution.settings["show-icons"], true.into());
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_raw_beats_preset_for_same_key() {
        let resolution = sample_resolver().resolve(&raw(&[
            ("preset", "featured".into()),
            ("columns", 4i64.into()),
        ]));

        assert_eq!(resolution.settings["layout"], "list".into());
        assert_eq!(resolution.settings["columns"], 4i64.into());
    }

    #[test]
    fn test_unknown_preset_warns_and_keeps_defaults() {
        let resolution = sample_resolver().resolve(&raw(&[("preset", "festive".into())]));

        assert_eq!(resolution.settings["layout"], "grid".into());
        assert_eq!(resolution.settings["columns"], 3i64.into());
        assert_eq!(
            resolution.warnings,
            vec![ResolveWarning::UnknownPreset {
                name: "festive".to_string()
            }]
        );
    }

    #[test]
    fn test_out_of_domain_raw_value_is_dropped_with_warning() {
        let resolution = sample_resolver().resolve(&raw(&[("columns", 99i64.into())]));

        assert_eq!(resolution.settings["columns"], 3i64.into());
        assert_eq!(
            resolution.warnings,
            vec![ResolveWarning::OutOfDomain {
                param: "columns".to_string(),
                value: 99i64.into(),
            }]
        );
    }

    #[test]
    fn test_out_of_domain_raw_value_keeps_preset_value() {
        // The prior layer here is the preset, not the default
        let resolution = sample_resolver().resolve(&raw(&[
            ("preset", "featured".into()),
            ("columns", 99i64.into()),
        ]));

        assert_eq!(resolution.settings["columns"], 1i64.into());
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_keys_are_inert() {
        let resolver = sample_resolver();
        let base = resolver.resolve(&RawProperties::new());
        let noisy = resolver.resolve(&raw(&[("bogusKey", "x".into())]));

        assert_eq!(base.settings, noisy.settings);
        assert!(noisy.warnings.is_empty());
    }

    #[test]
    fn test_wrong_shape_value_is_out_of_domain() {
        // A string where a number is declared fails the domain check
        let resolution = sample_resolver().resolve(&raw(&[("columns", "two".into())]));

        assert_eq!(resolution.settings["columns"], 3i64.into());
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_resolution_is_fresh_per_call() {
        let resolver = sample_resolver();
        let input = raw(&[("preset", "compact".into()), ("heading", "Why us".into())]);

        let first = resolver.resolve(&input);
        let second = resolver.resolve(&input);
        assert_eq!(first.settings, second.settings);
        assert_eq!(first.warnings, second.warnings);
    }

    fn arb_value() -> impl Strategy<Value = ParamValue> {
        prop_oneof![
            any::<bool>().prop_map(ParamValue::Bool),
            (-10.0..10.0f64).prop_map(ParamValue::Number),
            "[a-z]{0,8}".prop_map(ParamValue::Text),
        ]
    }

    fn arb_raw() -> impl Strategy<Value = RawProperties> {
        proptest::collection::btree_map("[a-z-]{1,10}", arb_value(), 0..6)
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent(input in arb_raw()) {
            let resolver = sample_resolver();
            let first = resolver.resolve(&input);
            let second = resolver.resolve(&input);
            prop_assert_eq!(first.settings, second.settings);
        }

        #[test]
        fn prop_every_declared_param_is_present(input in arb_raw()) {
            let resolver = sample_resolver();
            let resolution = resolver.resolve(&input);
            for spec in resolver.schema().iter() {
                prop_assert!(resolution.settings.contains_key(&spec.name));
            }
        }

        #[test]
        fn prop_unknown_keys_never_change_output(
            input in arb_raw(),
            junk in proptest::collection::btree_map("zz[a-z]{1,6}", arb_value(), 1..4),
        ) {
            // No declared parameter (and no preset key) starts with "zz"
            let resolver = sample_resolver();
            let base = resolver.resolve(&input);

            let mut noisy = input.clone();
            for (key, value) in junk {
                noisy.entry(key).or_insert(value);
            }
            let with_junk = resolver.resolve(&noisy);
            prop_assert_eq!(base.settings, with_junk.settings);
        }

        #[test]
        fn prop_settings_are_always_domain_valid(input in arb_raw()) {
            let resolver = sample_resolver();
            let resolution = resolver.resolve(&input);
            for spec in resolver.schema().iter() {
                prop_assert!(spec.validate(&resolution.settings[&spec.name]));
            }
        }
    }
}
