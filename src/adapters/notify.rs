use crate::core::{Publisher, WebSocketEvent};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// In-process hub that connected clients subscribe to.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<WebSocketEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WebSocketEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl Publisher for BroadcastPublisher {
    async fn publish(&self, event: &WebSocketEvent) -> Result<()> {
        // No connected clients is not a failure.
        if self.sender.send(event.clone()).is_err() {
            tracing::debug!(
                "No subscribers for {} (user {})",
                event.event.as_str(),
                event.broadcast.user_id
            );
        }
        Ok(())
    }
}

/// Posts each event as JSON to an external push gateway.
#[derive(Debug, Clone)]
pub struct WebhookPublisher {
    client: Client,
    endpoint: String,
}

impl WebhookPublisher {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&self, event: &WebSocketEvent) -> Result<()> {
        tracing::debug!("Posting {} to {}", event.event.as_str(), self.endpoint);
        let response = self.client.post(&self.endpoint).json(event).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Publish {
                message: format!("{} responded with {}", self.endpoint, status),
            });
        }
        Ok(())
    }
}

/// Writes every event to the log.
#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, event: &WebSocketEvent) -> Result<()> {
        let payload = event.to_json()?;
        tracing::info!(
            event = event.event.as_str(),
            user_id = %event.broadcast.user_id,
            payload = %payload,
            "event published"
        );
        Ok(())
    }
}

/// Delivers to every inner publisher, reporting the first failure after
/// all of them have been tried.
#[derive(Clone, Default)]
pub struct FanoutPublisher {
    publishers: Vec<Arc<dyn Publisher>>,
}

impl FanoutPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publishers.push(publisher);
        self
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

#[async_trait]
impl Publisher for FanoutPublisher {
    async fn publish(&self, event: &WebSocketEvent) -> Result<()> {
        let mut first_error = None;
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(event).await {
                tracing::warn!("Publisher failed for {}: {}", event.event.as_str(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
