// Build command for writing the catalog file

use crate::catalog::ExtensionRecord;
use crate::commands;
use crate::config::Config;
use crate::ui;
use anyhow::Context;
use log::info;
use std::path::Path;

pub async fn build(config: &Config, output: &Path) -> anyhow::Result<()> {
    let catalog = commands::fetch_catalog(config).await?;

    // Only a complete catalog reaches the disk
    write_catalog(&catalog, output)?;
    info!("Wrote {} extension(s) to {}", catalog.len(), output.display());
    ui::success(&format!(
        "Wrote {} extension(s) to {}",
        catalog.len(),
        output.display()
    ));
    Ok(())
}

pub fn write_catalog(catalog: &[ExtensionRecord], output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let text = serde_json::to_string(catalog)?;
    std::fs::write(output, text)
        .with_context(|| format!("Failed to write catalog to {}", output.display()))?;
    Ok(())
}
