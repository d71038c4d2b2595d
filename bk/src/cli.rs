//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::value::ParamValue;

/// blockkit - block configuration resolver
#[derive(Parser)]
#[command(
    name = "bk",
    about = "Resolve presentational block configuration from schemas and presets",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// List available block types
    List,

    /// Show a block type's parameters and presets
    Show {
        /// Block type name
        block: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve a block's settings from a preset and raw properties
    Resolve {
        /// Block type name
        block: String,

        /// Preset to apply before explicit properties
        #[arg(short, long)]
        preset: Option<String>,

        /// Explicit properties
        #[arg(value_name = "KEY=VALUE")]
        props: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check the block definition search paths
    Doctor,
}

/// Output format for show/resolve commands
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Parse a `KEY=VALUE` property argument.
pub fn parse_prop(s: &str) -> Result<(String, ParamValue), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), ParamValue::parse_literal(value)))
        }
        _ => Err(format!("Invalid property '{}'. Use KEY=VALUE", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::parse_from(["bk", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::parse_from(["bk", "show", "hero"]);
        if let Command::Show { block, format } = cli.command {
            assert_eq!(block, "hero");
            assert!(matches!(format, OutputFormat::Text));
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_parse_resolve() {
        let cli = Cli::parse_from(["bk", "resolve", "benefits", "--preset", "featured", "columns=4"]);
        if let Command::Resolve {
            block,
            preset,
            props,
            ..
        } = cli.command
        {
            assert_eq!(block, "benefits");
            assert_eq!(preset, Some("featured".to_string()));
            assert_eq!(props, vec!["columns=4"]);
        } else {
            panic!("Expected Resolve command");
        }
    }

    #[test]
    fn test_cli_parse_doctor() {
        let cli = Cli::parse_from(["bk", "doctor"]);
        assert!(matches!(cli.command, Command::Doctor));
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["bk", "-c", "/path/to/blockkit.yml", "list"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/blockkit.yml")));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_prop() {
        assert_eq!(
            parse_prop("columns=4").unwrap(),
            ("columns".to_string(), ParamValue::Number(4.0))
        );
        assert_eq!(
            parse_prop("layout=list").unwrap(),
            ("layout".to_string(), ParamValue::Text("list".to_string()))
        );
        assert_eq!(
            parse_prop("show-icons=false").unwrap(),
            ("show-icons".to_string(), ParamValue::Bool(false))
        );
        // Value may contain '='
        assert_eq!(
            parse_prop("heading=a=b").unwrap(),
            ("heading".to_string(), ParamValue::Text("a=b".to_string()))
        );
        assert!(parse_prop("no-equals").is_err());
        assert!(parse_prop("=value").is_err());
    }
}
