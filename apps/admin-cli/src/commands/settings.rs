use anyhow::Result;
use tracing::info;

use catalog_client::CatalogClient;
use catalog_core::settings::{AdminSettings, SettingUpdate};

use super::print_json;
use crate::cli::SettingsCommand;

pub async fn run(client: &CatalogClient, action: SettingsCommand, json: bool) -> Result<()> {
    match action {
        SettingsCommand::Show => {
            let settings = client.get_settings().await?;
            show(&settings, json)
        }
        SettingsCommand::Set { key, value } => {
            let update = SettingUpdate::parse(&key, value)?;
            client.update_setting(&update).await?;
            info!(key = %update.key, value, "Setting updated");

            // The store is the source of truth; show what it now holds.
            let settings = client.get_settings().await?;
            show(&settings, json)
        }
    }
}

fn show(settings: &AdminSettings, json: bool) -> Result<()> {
    if json {
        return print_json(settings);
    }

    for (flag, on) in settings.flags() {
        println!(
            "{:<44} {:<28} {}",
            flag.path(),
            flag.label(),
            if on { "on" } else { "off" }
        );
    }
    Ok(())
}
