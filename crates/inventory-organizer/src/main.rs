use cloud_framework::tracing::setup_tracing;
use inventory_organizer::config::{load_config, AppConfig};
use inventory_organizer::lifecycle::InventorySystem;
use tracing::{info, warn, Instrument};

fn load_app_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("INVENTORY_CONFIG") {
        return Ok(load_config(path)?);
    }
    match AppConfig::from_env() {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(error = %e, "No configuration found, using local defaults");
            Ok(AppConfig::local())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = load_app_config()?;
    let system = InventorySystem::from_config(&config);
    let mut view = system.view();

    view.load().await?;
    info!(signed_in = view.state().is_signed_in(), "Inventory loaded");

    // Mutations are refused until someone signs in.
    view.add_item("Widget").await?;
    if let Some(message) = &view.state().auth_error {
        warn!(%message, "Add refused");
    }

    let span = tracing::info_span!("sign_up");
    async {
        view.sign_up("ada@example.com", "analytical").await;
    }
    .instrument(span)
    .await;
    info!(session = ?view.state().session, "Signed up");

    let span = tracing::info_span!("stock");
    async {
        for name in ["Widget", "Widget", "Bolt", "Anvil"] {
            view.add_item(name).await?;
        }
        view.remove_item("Anvil").await?;
        for item in &view.state().inventory {
            info!(name = %item.name, quantity = item.quantity, "Stocked");
        }
        Ok::<_, inventory_organizer::inventory::InventoryError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("edit");
    async {
        if let Some(bolt) = view
            .state()
            .inventory
            .iter()
            .find(|item| item.name == "Bolt")
            .cloned()
        {
            view.select_item(bolt);
            view.begin_edit();
            view.edit_selected(|item| {
                item.description = "M6 zinc plated".to_string();
                item.price = 0.25;
                item.category = "hardware".to_string();
                item.quantity = 40;
            });
            view.save_edit().await?;
            view.close_details();
        }
        Ok::<_, inventory_organizer::inventory::InventoryError>(())
    }
    .instrument(span)
    .await?;

    view.set_filter_category("hardware");
    info!(
        categories = ?view.categories(),
        visible = ?view.visible_items().iter().map(|i| &i.name).collect::<Vec<_>>(),
        "Filtered"
    );

    view.sign_out().await;
    info!(signed_in = view.state().is_signed_in(), "Signed out");

    view.teardown();
    drop(view);
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
