use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Print the effective configuration. The database password and signing
/// secret are never serialized, so the output is safe to share.
pub fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(config, output_format)?);
    Ok(())
}

fn render(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<String> {
    Ok(match output_format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Text => serde_yaml::to_string(config)?,
    })
}
