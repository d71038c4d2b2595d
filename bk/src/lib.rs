//! Blockkit - schema-driven configuration resolution for presentational
//! content blocks.
//!
//! A block type (hero section, benefit grid, testimonial panel, ...)
//! declares a parameter schema and a table of named presets. At render
//! time the caller hands over a raw property bag; the resolver merges
//! defaults, preset and raw values into a fully-defaulted, validated
//! settings mapping for the render layer to consume.
//!
//! # Core Concepts
//!
//! - **Fail Fast on Authoring**: schema and preset defects are caught
//!   when definitions load, never at resolution time
//! - **Explicit Beats Implicit**: raw values beat preset values beat
//!   schema defaults
//! - **Always a Usable Result**: out-of-domain raw values are dropped
//!   with a warning; unknown keys are inert
//! - **Pure Resolution**: `resolve()` is synchronous and side-effect
//!   free, so concurrent callers need no coordination
//!
//! # Modules
//!
//! - [`schema`] - parameter declarations and load-time validation
//! - [`preset`] - named shorthand bundles of settings values
//! - [`resolver`] - the default/preset/raw merge
//! - [`blocks`] - block definitions, builtin and directory-loaded
//! - [`config`] - configuration types and loading
//! - [`doctor`] - search path diagnostics
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```
//! use blockkit::{BlockLibrary, ParamValue, RawProperties};
//!
//! let library = BlockLibrary::builtin().unwrap();
//! let benefits = library.get("benefits").unwrap();
//!
//! let mut raw = RawProperties::new();
//! raw.insert("preset".to_string(), ParamValue::Text("featured".to_string()));
//! raw.insert("columns".to_string(), ParamValue::Number(4.0));
//!
//! let resolution = benefits.resolver.resolve(&raw);
//! assert_eq!(resolution.settings["layout"], ParamValue::Text("list".to_string()));
//! assert_eq!(resolution.settings["columns"], ParamValue::Number(4.0));
//! ```

pub mod blocks;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod preset;
pub mod resolver;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use blocks::{BlockDef, BlockLibrary, BlockType};
pub use config::{BlocksConfig, Config};
pub use doctor::{FileCheck, PathCheck, PathReport};
pub use preset::{PresetSpec, PresetTable};
pub use resolver::{RawProperties, Resolution, ResolveWarning, Resolver};
pub use schema::{ParamKind, ParamSchema, ParamSpec, SchemaError};
pub use value::ParamValue;
