// Adapters layer: concrete stores and publishers behind the domain ports.

pub mod notify;
pub mod storage;

pub use notify::{BroadcastPublisher, FanoutPublisher, LogPublisher, WebhookPublisher};
pub use storage::{JsonFileStore, MemoryStore};
