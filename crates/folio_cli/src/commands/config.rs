use std::path::PathBuf;

use folio_core::{FolioConfig, config};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;

use crate::output::Output;

/// Show current configuration
pub async fn show(config: &FolioConfig) -> Result<()> {
    let output = Output::new();

    output.section("Current Configuration");
    output.print("");

    let toml_str = toml::to_string_pretty(config).into_diagnostic()?;
    output.print(&toml_str);

    Ok(())
}

/// Save current configuration to file
pub async fn save(config: &FolioConfig, path: &PathBuf) -> Result<()> {
    let output = Output::new();

    output.info("💾", &format!("Saving configuration to: {}", path.display()));

    config::save_config(config, path).await?;

    output.success("Configuration saved successfully!");
    output.print("");
    output.print("To use this configuration, run:");
    output.print(&format!("  {} --config {}", "folio".bright_green(), path.display()));

    Ok(())
}
