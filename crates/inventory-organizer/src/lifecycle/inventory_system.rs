use crate::config::{AppConfig, InventorySettings};
use crate::inventory::{self, InventoryGateway};
use crate::session::{self, SessionGate};
use crate::view::InventoryView;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Runtime orchestrator: owns the collection and account actors and hands out clients.
///
/// # Example
///
/// ```ignore
/// let system = InventorySystem::new();
/// let session = system.sessions.sign_up("ada@example.com", "analytical").await?;
/// system.gateway.add(Some(&session), "Widget").await?;
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    /// Client for the inventory collection.
    pub gateway: InventoryGateway,

    /// Client for the account service.
    pub sessions: SessionGate,

    handles: Vec<JoinHandle<()>>,
}

impl Default for InventorySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl InventorySystem {
    /// Starts both services with default settings.
    pub fn new() -> Self {
        Self::with_settings(&InventorySettings::default())
    }

    /// Starts both services from a loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        info!(
            project = %config.project.project_id,
            auth_domain = %config.project.auth_domain,
            "Starting inventory system"
        );
        Self::with_settings(&config.inventory)
    }

    /// Starts both services with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if `settings.channel_capacity` is zero. [`AppConfig::validate`] rejects that
    /// value for loaded configurations; settings built by hand are not checked.
    pub fn with_settings(settings: &InventorySettings) -> Self {
        let (collection_actor, gateway) = inventory::new(settings);
        let (account_actor, sessions) = session::new(settings.channel_capacity);

        let collection_handle = tokio::spawn(collection_actor.run());
        let account_handle = tokio::spawn(account_actor.run());

        Self {
            gateway,
            sessions,
            handles: vec![collection_handle, account_handle],
        }
    }

    /// A fresh view over this system's services.
    pub fn view(&self) -> InventoryView {
        InventoryView::new(self.gateway.clone(), self.sessions.clone())
    }

    /// Drops the system's clients and waits for both actors to exit.
    ///
    /// Actors stop when their last client is gone, so every view and cloned client must be
    /// dropped first or this waits forever.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down system...");

        drop(self.gateway);
        drop(self.sessions);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
