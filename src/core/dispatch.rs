use crate::domain::model::WebSocketEvent;
use crate::domain::ports::Publisher;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Non-blocking handle onto the event queue.
///
/// `dispatch` never waits and never fails from the caller's point of view:
/// events that cannot be queued are logged and dropped. A worker task drains
/// the queue into the publisher and exits once every handle is dropped.
#[derive(Clone)]
pub struct EventDispatcher {
    sender: mpsc::Sender<WebSocketEvent>,
}

impl EventDispatcher {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(publisher: Arc<dyn Publisher>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<WebSocketEvent>(capacity.max(1));

        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                tracing::debug!(
                    "Publishing {} for user {}",
                    event.event.as_str(),
                    event.broadcast.user_id
                );
                if let Err(e) = publisher.publish(&event).await {
                    tracing::warn!("Failed to publish {}: {}", event.event.as_str(), e);
                }
            }
            tracing::debug!("Event dispatcher stopped");
        });

        (Self { sender }, handle)
    }

    pub fn dispatch(&self, event: WebSocketEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    "Event queue full, dropping {} for user {}",
                    event.event.as_str(),
                    event.broadcast.user_id
                );
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(
                    "Event dispatcher closed, dropping {} for user {}",
                    event.event.as_str(),
                    event.broadcast.user_id
                );
            }
        }
    }
}
