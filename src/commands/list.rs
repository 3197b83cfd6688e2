// List command for printing the catalog

use crate::commands;
use crate::config::Config;
use crate::ui;

pub async fn list(config: &Config) -> anyhow::Result<()> {
    let catalog = commands::fetch_catalog(config).await?;

    if catalog.is_empty() {
        ui::dim("No prebuilt extensions found.");
        return Ok(());
    }

    ui::catalog_table(&catalog);
    Ok(())
}
