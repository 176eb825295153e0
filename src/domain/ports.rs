use crate::domain::model::{Preference, Preferences, WebSocketEvent};
use crate::utils::error::{Result, StoreResult};
use async_trait::async_trait;

/// Keyed storage of per-user preference records.
///
/// Collections come back ordered by `(category, name)`. `save` upserts every
/// record; deleting a record that does not exist is not an error.
pub trait PreferenceStore: Send + Sync {
    fn get_all(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Preferences>> + Send;
    fn get_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> impl std::future::Future<Output = StoreResult<Preferences>> + Send;
    fn get(
        &self,
        user_id: &str,
        category: &str,
        name: &str,
    ) -> impl std::future::Future<Output = StoreResult<Preference>> + Send;
    fn save(
        &self,
        preferences: &Preferences,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;
    fn delete(
        &self,
        user_id: &str,
        category: &str,
        name: &str,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;
}

/// Sink for real-time events.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, event: &WebSocketEvent) -> Result<()>;
}
