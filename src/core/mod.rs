pub mod dispatch;
pub mod service;

pub use crate::domain::model::{
    Broadcast, EventKind, Preference, Preferences, WebSocketEvent,
};
pub use crate::domain::ports::{PreferenceStore, Publisher};
pub use crate::utils::error::Result;
