//! blockkit - block configuration resolver
//!
//! CLI entry point for inspecting block types and resolving settings.

use std::collections::BTreeMap;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use blockkit::blocks::BlockLibrary;
use blockkit::cli::{Cli, Command, OutputFormat, parse_prop};
use blockkit::config::Config;
use blockkit::doctor;
use blockkit::resolver::{RawProperties, Resolver};
use blockkit::value::ParamValue;

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "blockkit=debug" } else { "blockkit=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Command::List => {
            let library = BlockLibrary::load(&config.blocks)?;
            for (name, block) in library.iter() {
                println!("{:<16} {}", name.cyan(), block.description);
            }
        }
        Command::Show { block, format } => {
            let library = BlockLibrary::load(&config.blocks)?;
            let block_type = library
                .get(&block)
                .ok_or_else(|| eyre::eyre!("Unknown block type: {}", block))?;
            show_block(block_type, &format)?;
        }
        Command::Resolve {
            block,
            preset,
            props,
            format,
        } => {
            let library = BlockLibrary::load(&config.blocks)?;
            let block_type = library
                .get(&block)
                .ok_or_else(|| eyre::eyre!("Unknown block type: {}", block))?;

            let mut raw: RawProperties = BTreeMap::new();
            if let Some(name) = preset {
                raw.insert(Resolver::PRESET_KEY.to_string(), ParamValue::Text(name));
            }
            for prop in &props {
                let (key, value) = parse_prop(prop).map_err(|e| eyre::eyre!(e))?;
                raw.insert(key, value);
            }

            info!(block = %block, props = raw.len(), "resolving");
            let resolution = block_type.resolver.resolve(&raw);

            match format {
                OutputFormat::Text => {
                    for (key, value) in &resolution.settings {
                        println!("{} = {}", key.cyan(), value);
                    }
                    for warning in &resolution.warnings {
                        eprintln!("{} {}", "warning:".yellow(), warning);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&resolution)?);
                }
            }
        }
        Command::Doctor => {
            let report = doctor::check_paths(&config);
            render_report(&report);
            if !report.usable() {
                eprintln!("{} no usable source of block definitions", "error:".red());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn show_block(block_type: &blockkit::BlockType, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}  {}", block_type.name.cyan().bold(), block_type.description);
            println!();
            println!("Parameters:");
            for spec in block_type.resolver.schema().iter() {
                println!(
                    "  {:<18} {:<28} default = {}",
                    spec.name.yellow(),
                    spec.kind.describe(),
                    spec.default
                );
            }
            if !block_type.resolver.presets().is_empty() {
                println!();
                println!("Presets:");
                for preset in block_type.resolver.presets().iter() {
                    let pairs = preset
                        .settings
                        .iter()
                        .map(|(k, v)| format!("{} = {}", k, v))
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("  {:<18} {}", preset.name.green(), pairs);
                }
            }
        }
        OutputFormat::Json => {
            let presets: BTreeMap<&str, &BTreeMap<String, ParamValue>> = block_type
                .resolver
                .presets()
                .iter()
                .map(|p| (p.name.as_str(), &p.settings))
                .collect();
            let view = serde_json::json!({
                "name": block_type.name,
                "description": block_type.description,
                "params": block_type.resolver.schema(),
                "presets": presets,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

fn render_report(report: &doctor::PathReport) {
    if report.builtin_enabled {
        println!("{} builtin block definitions enabled", "✓".green());
    } else {
        println!("{} builtin block definitions disabled", "-".dimmed());
    }

    for check in &report.paths {
        if !check.exists {
            println!("{} {} (not found)", "-".dimmed(), check.path.display());
            continue;
        }
        if !check.is_dir {
            println!("{} {} exists but is not a directory", "✗".red(), check.path.display());
            continue;
        }
        println!(
            "{} {} ({} definition file(s))",
            "✓".green(),
            check.path.display(),
            check.files.len()
        );
        for file in &check.files {
            match &file.error {
                None => println!("    {} {}", "✓".green(), file.path.display()),
                Some(e) => println!("    {} {}: {}", "✗".red(), file.path.display(), e),
            }
        }
        if let Some(e) = &check.error {
            println!("    {} {}", "✗".red(), e);
        }
    }
}
