//! Block definitions and the block library.
//!
//! A block definition bundles one block type's parameter schema and
//! preset table, authored in YAML:
//!
//! ```yaml
//! description: "Benefit grid"
//! params:
//!   layout: { type: select, values: [grid, list, carousel], default: grid }
//!   columns: { type: number, min: 1, max: 4, default: 3 }
//! presets:
//!   featured: { layout: list, columns: 1 }
//! ```
//!
//! Definitions are loaded from:
//! 1. Builtin (embedded in the binary)
//! 2. User global (~/.config/blockkit/blocks/*.yml)
//! 3. Project-specific (.blockkit/blocks/*.yml)
//!
//! Later definitions override earlier ones with the same name. A broken
//! file in a user directory is skipped with a warning; a broken builtin
//! is a hard error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BlocksConfig;
use crate::preset::{PresetSpec, PresetTable};
use crate::resolver::Resolver;
use crate::schema::{ParamSchema, ParamSpec, SchemaError};
use crate::value::ParamValue;

/// One block type's definition as authored in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    #[serde(default)]
    pub description: String,

    /// Parameter name -> spec body (`type`, domain fields, `default`)
    pub params: BTreeMap<String, ParamSpec>,

    /// Preset name -> parameter name -> value
    #[serde(default)]
    pub presets: BTreeMap<String, BTreeMap<String, ParamValue>>,
}

impl BlockDef {
    /// Compile the definition into a validated block type.
    ///
    /// All schema and preset authoring checks run here, so a compiled
    /// block can never produce out-of-domain settings.
    pub fn compile(self, name: &str) -> Result<BlockType, SchemaError> {
        let specs = self
            .params
            .into_iter()
            .map(|(param_name, mut spec)| {
                spec.name = param_name;
                spec
            })
            .collect();
        let schema = ParamSchema::new(specs)?;

        let presets = self
            .presets
            .into_iter()
            .map(|(preset_name, settings)| PresetSpec {
                name: preset_name,
                settings,
            })
            .collect();
        let table = PresetTable::new(presets, &schema)?;

        Ok(BlockType {
            name: name.to_string(),
            description: self.description,
            resolver: Resolver::new(schema, table),
        })
    }
}

/// A compiled block type: name, description and its resolver.
pub struct BlockType {
    pub name: String,
    pub description: String,
    pub resolver: Resolver,
}

/// Builtin block definitions (embedded in binary)
const BUILTIN_HERO: &str = include_str!("builtin/hero.yml");
const BUILTIN_BENEFITS: &str = include_str!("builtin/benefits.yml");
const BUILTIN_TESTIMONIALS: &str = include_str!("builtin/testimonials.yml");
const BUILTIN_USECASES: &str = include_str!("builtin/usecases.yml");
const BUILTIN_TEASER: &str = include_str!("builtin/teaser.yml");

/// All known block types, keyed by name.
pub struct BlockLibrary {
    types: BTreeMap<String, BlockType>,
}

impl BlockLibrary {
    /// Load all block types from the configured sources.
    pub fn load(config: &BlocksConfig) -> Result<Self> {
        let mut library = Self {
            types: BTreeMap::new(),
        };

        if config.use_builtin() {
            library.load_builtins()?;
        } else {
            debug!("builtin block definitions disabled");
        }

        for path in config.expanded_paths() {
            if path.exists() {
                library.load_from_directory(&path)?;
            } else {
                debug!(?path, "block directory does not exist, skipping");
            }
        }

        info!(count = library.types.len(), "Loaded block types");
        Ok(library)
    }

    /// Load only the builtin block types.
    pub fn builtin() -> Result<Self> {
        Self::load(&BlocksConfig {
            paths: vec!["builtin".to_string()],
        })
    }

    fn load_builtins(&mut self) -> Result<()> {
        self.load_builtin("hero", BUILTIN_HERO)?;
        self.load_builtin("benefits", BUILTIN_BENEFITS)?;
        self.load_builtin("testimonials", BUILTIN_TESTIMONIALS)?;
        self.load_builtin("usecases", BUILTIN_USECASES)?;
        self.load_builtin("teaser", BUILTIN_TEASER)?;
        debug!("loaded 5 builtin block types");
        Ok(())
    }

    fn load_builtin(&mut self, name: &str, yaml: &str) -> Result<()> {
        let def: BlockDef = serde_yaml::from_str(yaml)
            .with_context(|| format!("Failed to parse builtin block: {}", name))?;
        let block = def
            .compile(name)
            .with_context(|| format!("Invalid builtin block: {}", name))?;
        self.types.insert(name.to_string(), block);
        Ok(())
    }

    /// Load all .yml files from a directory. One bad file must not take
    /// the library down, so per-file failures degrade to warnings.
    fn load_from_directory(&mut self, dir: &Path) -> Result<()> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path
                .extension()
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false)
            {
                if let Err(e) = self.load_from_file(&path) {
                    warn!(?path, error = %e, "Failed to load block definition");
                }
            }
        }
        Ok(())
    }

    /// Load one block definition; the filename stem is the block name.
    fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;
        let def: BlockDef = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse: {}", path.display()))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| eyre::eyre!("Invalid filename: {}", path.display()))?;

        let block = def
            .compile(name)
            .with_context(|| format!("Invalid block definition: {}", path.display()))?;

        debug!(%name, ?path, "loaded block definition");
        self.types.insert(name.to_string(), block);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BlockType> {
        self.types.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlockType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RawProperties;

    #[test]
    fn test_all_builtins_compile() {
        for (name, yaml) in [
            ("hero", BUILTIN_HERO),
            ("benefits", BUILTIN_BENEFITS),
            ("testimonials", BUILTIN_TESTIMONIALS),
            ("usecases", BUILTIN_USECASES),
            ("teaser", BUILTIN_TEASER),
        ] {
            let def: BlockDef = serde_yaml::from_str(yaml).unwrap();
            assert!(!def.params.is_empty(), "{name} declares no parameters");
            def.compile(name).unwrap();
        }
    }

    #[test]
    fn test_builtin_library_names() {
        let library = BlockLibrary::builtin().unwrap();
        let names: Vec<&str> = library.names().collect();
        assert_eq!(
            names,
            vec!["benefits", "hero", "teaser", "testimonials", "usecases"]
        );
        assert_eq!(library.len(), 5);
        assert!(!library.is_empty());
    }

    #[test]
    fn test_benefits_featured_scenario() {
        let library = BlockLibrary::builtin().unwrap();
        let benefits = library.get("benefits").unwrap();

        let mut raw = RawProperties::new();
        raw.insert("preset".to_string(), "featured".into());
        let resolution = benefits.resolver.resolve(&raw);
        assert_eq!(resolution.settings["layout"], "list".into());
        assert_eq!(resolution.settings["columns"], 1i64.into());

        raw.insert("columns".to_string(), 4i64.into());
        let resolution = benefits.resolver.resolve(&raw);
        assert_eq!(resolution.settings["layout"], "list".into());
        assert_eq!(resolution.settings["columns"], 4i64.into());
    }

    #[test]
    fn test_directory_definition_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hero.yml"),
            "description: \"Custom hero\"\nparams:\n  size: { type: select, values: [tall, short], default: tall }\n",
        )
        .unwrap();

        let config = BlocksConfig {
            paths: vec!["builtin".to_string(), dir.path().to_string_lossy().into_owned()],
        };
        let library = BlockLibrary::load(&config).unwrap();

        let hero = library.get("hero").unwrap();
        assert_eq!(hero.description, "Custom hero");
        assert_eq!(hero.resolver.schema().len(), 1);
        // The other builtins are untouched
        assert_eq!(library.len(), 5);
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.yml"), "params: {{{not yaml").unwrap();
        fs::write(
            dir.path().join("banner.yml"),
            "params:\n  wide: { type: boolean, default: true }\n",
        )
        .unwrap();

        let config = BlocksConfig {
            paths: vec![dir.path().to_string_lossy().into_owned()],
        };
        let library = BlockLibrary::load(&config).unwrap();

        assert!(library.get("broken").is_none());
        assert!(library.get("banner").is_some());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_invalid_schema_in_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        // Default outside its own domain
        fs::write(
            dir.path().join("bad.yml"),
            "params:\n  cols: { type: number, min: 1, max: 4, default: 9 }\n",
        )
        .unwrap();

        let config = BlocksConfig {
            paths: vec![dir.path().to_string_lossy().into_owned()],
        };
        let library = BlockLibrary::load(&config).unwrap();
        assert!(library.is_empty());
    }
}
