// Application wiring: turns a ServiceConfig into a running PreferenceService.

use crate::adapters::{
    BroadcastPublisher, FanoutPublisher, JsonFileStore, LogPublisher, MemoryStore,
    WebhookPublisher,
};
use crate::config::toml_config::{ServiceConfig, BACKEND_MEMORY};
use crate::core::dispatch::EventDispatcher;
use crate::core::service::PreferenceService;
use crate::core::{Preference, PreferenceStore, Preferences};
use crate::utils::error::{Result, StoreResult};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Store selected at startup from `storage.backend`.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    Memory(MemoryStore),
    File(JsonFileStore),
}

impl ConfiguredStore {
    pub fn from_config(config: &ServiceConfig) -> Self {
        if config.storage.backend == BACKEND_MEMORY {
            ConfiguredStore::Memory(MemoryStore::new())
        } else {
            ConfiguredStore::File(JsonFileStore::new(&config.storage.data_dir))
        }
    }
}

impl PreferenceStore for ConfiguredStore {
    async fn get_all(&self, user_id: &str) -> StoreResult<Preferences> {
        match self {
            ConfiguredStore::Memory(store) => store.get_all(user_id).await,
            ConfiguredStore::File(store) => store.get_all(user_id).await,
        }
    }

    async fn get_category(&self, user_id: &str, category: &str) -> StoreResult<Preferences> {
        match self {
            ConfiguredStore::Memory(store) => store.get_category(user_id, category).await,
            ConfiguredStore::File(store) => store.get_category(user_id, category).await,
        }
    }

    async fn get(&self, user_id: &str, category: &str, name: &str) -> StoreResult<Preference> {
        match self {
            ConfiguredStore::Memory(store) => store.get(user_id, category, name).await,
            ConfiguredStore::File(store) => store.get(user_id, category, name).await,
        }
    }

    async fn save(&self, preferences: &Preferences) -> StoreResult<()> {
        match self {
            ConfiguredStore::Memory(store) => store.save(preferences).await,
            ConfiguredStore::File(store) => store.save(preferences).await,
        }
    }

    async fn delete(&self, user_id: &str, category: &str, name: &str) -> StoreResult<()> {
        match self {
            ConfiguredStore::Memory(store) => store.delete(user_id, category, name).await,
            ConfiguredStore::File(store) => store.delete(user_id, category, name).await,
        }
    }
}

pub struct App {
    pub service: PreferenceService<ConfiguredStore>,
    pub hub: BroadcastPublisher,
    pub dispatcher: JoinHandle<()>,
}

impl App {
    /// Builds the store, the publisher chain and the event worker.
    /// Must be called inside a tokio runtime.
    pub fn build(config: &ServiceConfig) -> Result<Self> {
        let hub = BroadcastPublisher::new(config.events.buffer_size);

        let mut publisher = FanoutPublisher::new().with(Arc::new(hub.clone()));
        if config.events.log_events {
            publisher = publisher.with(Arc::new(LogPublisher));
        }
        if let Some(url) = &config.events.webhook_url {
            publisher = publisher.with(Arc::new(WebhookPublisher::new(url.clone())?));
        }
        tracing::debug!("Configured {} event publishers", publisher.len());

        let (events, dispatcher) =
            EventDispatcher::spawn(Arc::new(publisher), config.events.buffer_size);
        let store = ConfiguredStore::from_config(config);

        Ok(Self {
            service: PreferenceService::new(store, events),
            hub,
            dispatcher,
        })
    }

    /// Drops the service and waits for queued events to be published.
    pub async fn shutdown(self) {
        let Self {
            service,
            hub,
            dispatcher,
        } = self;
        drop(service);
        drop(hub);
        if let Err(e) = dispatcher.await {
            tracing::warn!("Event dispatcher ended abnormally: {}", e);
        }
    }
}
