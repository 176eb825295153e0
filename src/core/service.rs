use crate::core::dispatch::EventDispatcher;
use crate::domain::model::{EventKind, Preference, Preferences, WebSocketEvent};
use crate::domain::ports::PreferenceStore;
use crate::utils::error::{AppError, Result};

const GET_ALL: &str = "getPreferences";
const GET_CATEGORY: &str = "getPreferenceCategory";
const GET_ONE: &str = "getPreferenceByCategoryAndName";
const SAVE: &str = "savePreferences";
const DELETE: &str = "deletePreferences";

/// Application-level preference operations.
///
/// Reads go straight to the store. Writes are rejected as a whole when any
/// record belongs to another user, and a successful write queues exactly one
/// event for the acting user.
pub struct PreferenceService<S: PreferenceStore> {
    store: S,
    events: EventDispatcher,
}

impl<S: PreferenceStore> PreferenceService<S> {
    pub fn new(store: S, events: EventDispatcher) -> Self {
        Self { store, events }
    }

    pub async fn get_preferences_for_user(&self, user_id: &str) -> Result<Preferences> {
        tracing::debug!("Fetching all preferences for user {}", user_id);
        self.store
            .get_all(user_id)
            .await
            .map_err(|e| AppError::store(GET_ALL, e))
    }

    pub async fn get_preference_by_category_for_user(
        &self,
        user_id: &str,
        category: &str,
    ) -> Result<Preferences> {
        tracing::debug!("Fetching category {} for user {}", category, user_id);
        let preferences = self
            .store
            .get_category(user_id, category)
            .await
            .map_err(|e| AppError::store(GET_CATEGORY, e))?;

        if preferences.is_empty() {
            return Err(AppError::CategoryNotFound {
                user_id: user_id.to_string(),
                category: category.to_string(),
            });
        }

        Ok(preferences)
    }

    pub async fn get_preference_by_category_and_name_for_user(
        &self,
        user_id: &str,
        category: &str,
        name: &str,
    ) -> Result<Preference> {
        tracing::debug!(
            "Fetching preference {}/{} for user {}",
            category,
            name,
            user_id
        );
        self.store
            .get(user_id, category, name)
            .await
            .map_err(|e| AppError::store(GET_ONE, e))
    }

    pub async fn update_preferences(&self, user_id: &str, preferences: Preferences) -> Result<()> {
        check_ownership(SAVE, user_id, &preferences)?;

        self.store
            .save(&preferences)
            .await
            .map_err(|e| AppError::store(SAVE, e))?;

        tracing::debug!("Saved {} preferences for user {}", preferences.len(), user_id);
        self.notify(EventKind::PreferencesChanged, user_id, &preferences)
    }

    /// Deletes records one at a time; the first storage failure stops the run.
    pub async fn delete_preferences(&self, user_id: &str, preferences: Preferences) -> Result<()> {
        check_ownership(DELETE, user_id, &preferences)?;

        for preference in &preferences {
            self.store
                .delete(user_id, &preference.category, &preference.name)
                .await
                .map_err(|e| AppError::store(DELETE, e))?;
        }

        tracing::debug!(
            "Deleted {} preferences for user {}",
            preferences.len(),
            user_id
        );
        self.notify(EventKind::PreferencesDeleted, user_id, &preferences)
    }

    fn notify(&self, kind: EventKind, user_id: &str, preferences: &Preferences) -> Result<()> {
        let message = WebSocketEvent::for_preferences(kind, user_id, preferences)?;
        self.events.dispatch(message);
        Ok(())
    }
}

fn check_ownership(location: &'static str, user_id: &str, preferences: &Preferences) -> Result<()> {
    match preferences.iter().find(|p| p.user_id != user_id) {
        Some(foreign) => {
            tracing::warn!(
                "{}: user {} attempted to modify preferences of user {}",
                location,
                user_id,
                foreign.user_id
            );
            Err(AppError::Forbidden {
                location,
                user_id: user_id.to_string(),
                owner_id: foreign.user_id.clone(),
            })
        }
        None => Ok(()),
    }
}
