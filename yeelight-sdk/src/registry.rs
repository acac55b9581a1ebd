//! LightRegistry - main entry point for the SDK
//!
//! Owns one [`Light`] per configured bulb, the state cache they share and the
//! polling tasks that keep it fresh.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};
use yeelight_channel::{CommandChannel, Connector, Endpoint, TcpConnector};
use yeelight_state::{LightId, Snapshot, StateCache, StateChange};

use crate::config::BridgeConfig;
use crate::error::{Result, SdkError};
use crate::light::Light;
use crate::poller::{PollingStatus, PollingTask};

const CHANGE_BUFFER: usize = 64;

/// Registry of lights keyed by name
///
/// # Example
///
/// ```rust,no_run
/// use yeelight_sdk::{BridgeConfig, LightRegistry};
///
/// # async fn example() -> yeelight_sdk::Result<()> {
/// let registry = LightRegistry::new(BridgeConfig::default())?;
/// let desk = registry.add_light("desk", "192.168.1.40")?;
///
/// desk.set_power(true).await?;
/// registry.start_polling();
///
/// let mut changes = registry.subscribe_changes();
/// while let Ok(change) = changes.recv().await {
///     println!("{} changed: {:?}", change.light(), change.changed());
/// }
/// # Ok(())
/// # }
/// ```
pub struct LightRegistry {
    config: BridgeConfig,
    connector: Arc<dyn Connector>,
    cache: StateCache,
    changes: broadcast::Sender<StateChange>,
    lights: DashMap<LightId, Light>,
    pollers: DashMap<LightId, PollingTask>,
}

impl LightRegistry {
    /// Registry whose lights dial real TCP sockets
    pub fn new(config: BridgeConfig) -> Result<Self> {
        Self::with_connector(config, Arc::new(TcpConnector))
    }

    pub fn with_connector(config: BridgeConfig, connector: Arc<dyn Connector>) -> Result<Self> {
        config.validate()?;
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);

        Ok(Self {
            config,
            connector,
            cache: StateCache::new(),
            changes,
            lights: DashMap::new(),
            pollers: DashMap::new(),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Add a light listening on the configured port of `host`
    ///
    /// Must be called from within a tokio runtime.
    pub fn add_light(&self, name: &str, host: &str) -> Result<Light> {
        self.add_light_at(name, Endpoint::new(host).with_port(self.config.port))
    }

    pub fn add_light_at(&self, name: &str, endpoint: Endpoint) -> Result<Light> {
        let id = LightId::new(name);
        if id.as_str().is_empty() {
            return Err(SdkError::Configuration(
                "Light name must not be empty".to_string(),
            ));
        }

        match self.lights.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(SdkError::DuplicateLight(id.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let channel = CommandChannel::with_connector(
                    endpoint.clone(),
                    self.config.channel.clone(),
                    Arc::clone(&self.connector),
                )?;
                let light = Light::new(
                    id.clone(),
                    channel,
                    self.cache.clone(),
                    self.changes.clone(),
                    &self.config,
                );
                slot.insert(light.clone());
                info!(light = %id, %endpoint, "Light added");
                Ok(light)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Light> {
        self.lights
            .get(&LightId::new(name))
            .map(|entry| entry.value().clone())
    }

    /// All lights, ordered by name
    pub fn lights(&self) -> Vec<Light> {
        let mut lights: Vec<Light> = self.lights.iter().map(|e| e.value().clone()).collect();
        lights.sort_by(|a, b| a.id().cmp(b.id()));
        lights
    }

    pub fn names(&self) -> Vec<String> {
        self.cache.ids().into_iter().map(|id| id.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Stop polling `name`, close its channel and drop its cached state
    pub async fn remove_light(&self, name: &str) -> Result<()> {
        let id = LightId::new(name);
        let (_, light) = self
            .lights
            .remove(&id)
            .ok_or_else(|| SdkError::LightNotFound(id.to_string()))?;

        if let Some((_, poller)) = self.pollers.remove(&id) {
            poller.stop().await;
        }
        light.shutdown().await;
        info!(light = %id, "Light removed");
        Ok(())
    }

    pub fn snapshot(&self, name: &str) -> Option<Snapshot> {
        self.cache.snapshot(&LightId::new(name))
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    /// Changes from refreshes and acknowledged commands across all lights
    pub fn subscribe_changes(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    /// Start one polling task per light that is not already polled
    ///
    /// Returns how many tasks were started.
    pub fn start_polling(&self) -> usize {
        let mut started = 0;
        for light in self.lights() {
            let id = light.id().clone();
            if let Some(existing) = self.pollers.get(&id) {
                if existing.status().running {
                    continue;
                }
            }
            let task = PollingTask::start(
                light,
                self.config.poll_interval,
                self.config.max_consecutive_poll_errors,
            );
            self.pollers.insert(id, task);
            started += 1;
        }
        debug!(started, "Polling tasks started");
        started
    }

    /// Stop every polling task, waiting for in-flight refreshes
    pub async fn stop_polling(&self) {
        let ids: Vec<LightId> = self.pollers.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, poller)) = self.pollers.remove(&id) {
                poller.stop().await;
            }
        }
    }

    pub fn polling_status(&self, name: &str) -> Option<PollingStatus> {
        self.pollers
            .get(&LightId::new(name))
            .map(|poller| poller.status())
    }

    /// Stop polling and close every light's channel
    pub async fn shutdown(&self) {
        self.stop_polling().await;
        for light in self.lights() {
            self.lights.remove(light.id());
            light.shutdown().await;
        }
        info!("Registry shut down");
    }
}

impl std::fmt::Debug for LightRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightRegistry")
            .field("lights", &self.names())
            .field("polling", &self.pollers.len())
            .finish()
    }
}
