pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{BroadcastPublisher, JsonFileStore, MemoryStore, WebhookPublisher};
pub use crate::config::toml_config::ServiceConfig;
pub use crate::core::{dispatch::EventDispatcher, service::PreferenceService};
pub use crate::domain::model::{EventKind, Preference, Preferences, WebSocketEvent};
pub use crate::utils::error::{AppError, Result, StoreError};
