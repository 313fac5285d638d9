//! Configuration display.

use console::style;

use sitecheck::Config;

use crate::cli::icons::arrow;

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults (no config file found)".to_string());
    eprintln!("{} Source: {}", arrow(), style(source).dim());

    print!("{}", config.to_toml()?);
    Ok(())
}
