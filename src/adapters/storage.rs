use crate::core::{Preference, PreferenceStore, Preferences};
use crate::utils::error::{StoreError, StoreResult};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// (category, name) -> value, for one user.
type UserRecords = BTreeMap<(String, String), String>;

fn to_preferences<'a>(
    user_id: &str,
    records: impl Iterator<Item = (&'a (String, String), &'a String)>,
) -> Preferences {
    records
        .map(|((category, name), value)| Preference::new(user_id, category, name, value))
        .collect()
}

fn category_range<'a>(
    records: &'a UserRecords,
    category: &'a str,
) -> impl Iterator<Item = (&'a (String, String), &'a String)> {
    records
        .range((category.to_string(), String::new())..)
        .take_while(move |((c, _), _)| c == category)
}

fn not_found(user_id: &str, category: &str, name: &str) -> StoreError {
    StoreError::NotFound {
        user_id: user_id.to_string(),
        category: category.to_string(),
        name: name.to_string(),
    }
}

fn group_by_user(preferences: &Preferences) -> HashMap<&str, Vec<&Preference>> {
    let mut grouped: HashMap<&str, Vec<&Preference>> = HashMap::new();
    for preference in preferences {
        grouped
            .entry(preference.user_id.as_str())
            .or_default()
            .push(preference);
    }
    grouped
}

/// In-process store, used by tests and the `memory` backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, UserRecords>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    async fn get_all(&self, user_id: &str) -> StoreResult<Preferences> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|records| to_preferences(user_id, records.iter()))
            .unwrap_or_default())
    }

    async fn get_category(&self, user_id: &str, category: &str) -> StoreResult<Preferences> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|records| to_preferences(user_id, category_range(records, category)))
            .unwrap_or_default())
    }

    async fn get(&self, user_id: &str, category: &str, name: &str) -> StoreResult<Preference> {
        let users = self.users.read().await;
        users
            .get(user_id)
            .and_then(|records| records.get(&(category.to_string(), name.to_string())))
            .map(|value| Preference::new(user_id, category, name, value))
            .ok_or_else(|| not_found(user_id, category, name))
    }

    async fn save(&self, preferences: &Preferences) -> StoreResult<()> {
        let mut users = self.users.write().await;
        for preference in preferences {
            users
                .entry(preference.user_id.clone())
                .or_default()
                .insert(
                    (preference.category.clone(), preference.name.clone()),
                    preference.value.clone(),
                );
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, category: &str, name: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(records) = users.get_mut(user_id) {
            records.remove(&(category.to_string(), name.to_string()));
            if records.is_empty() {
                users.remove(user_id);
            }
        }
        Ok(())
    }
}

/// Stores each user's preferences as a JSON array in `<base_path>/<user_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn user_file(&self, user_id: &str) -> StoreResult<PathBuf> {
        if user_id.is_empty()
            || !user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoreError::Backend {
                message: format!("Invalid user id for file storage: {:?}", user_id),
            });
        }
        Ok(self.base_path.join(format!("{}.json", user_id)))
    }

    async fn load(&self, user_id: &str) -> StoreResult<UserRecords> {
        let path = self.user_file(user_id)?;
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(UserRecords::new()),
            Err(e) => return Err(e.into()),
        };

        let stored: Preferences = serde_json::from_slice(&data)?;
        Ok(stored
            .into_iter()
            .map(|p| ((p.category, p.name), p.value))
            .collect())
    }

    async fn store(&self, user_id: &str, records: &UserRecords) -> StoreResult<()> {
        let path = self.user_file(user_id)?;
        if records.is_empty() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.base_path).await?;

        let data = serde_json::to_vec_pretty(&to_preferences(user_id, records.iter()))?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        tracing::debug!("Wrote {} preferences to {}", records.len(), path.display());
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    async fn get_all(&self, user_id: &str) -> StoreResult<Preferences> {
        let records = self.load(user_id).await?;
        Ok(to_preferences(user_id, records.iter()))
    }

    async fn get_category(&self, user_id: &str, category: &str) -> StoreResult<Preferences> {
        let records = self.load(user_id).await?;
        Ok(to_preferences(user_id, category_range(&records, category)))
    }

    async fn get(&self, user_id: &str, category: &str, name: &str) -> StoreResult<Preference> {
        let records = self.load(user_id).await?;
        records
            .get(&(category.to_string(), name.to_string()))
            .map(|value| Preference::new(user_id, category, name, value))
            .ok_or_else(|| not_found(user_id, category, name))
    }

    async fn save(&self, preferences: &Preferences) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        for (user_id, batch) in group_by_user(preferences) {
            let mut records = self.load(user_id).await?;
            for preference in batch {
                records.insert(
                    (preference.category.clone(), preference.name.clone()),
                    preference.value.clone(),
                );
            }
            self.store(user_id, &records).await?;
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, category: &str, name: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load(user_id).await?;
        if records
            .remove(&(category.to_string(), name.to_string()))
            .is_some()
        {
            self.store(user_id, &records).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        vec![
            Preference::new("u1", "theme", "", "dark"),
            Preference::new("u1", "display_settings", "use_military_time", "true"),
            Preference::new("u1", "display_settings", "channel_display_mode", "full"),
            Preference::new("u2", "theme", "", "light"),
        ]
        .into()
    }

    #[tokio::test]
    async fn test_memory_store_orders_by_category_and_name() {
        let store = MemoryStore::new();
        store.save(&prefs()).await.unwrap();

        let all = store.get_all("u1").await.unwrap();
        let keys: Vec<(&str, &str)> = all
            .iter()
            .map(|p| (p.category.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("display_settings", "channel_display_mode"),
                ("display_settings", "use_military_time"),
                ("theme", ""),
            ]
        );
    }

    #[tokio::test]
    async fn test_memory_store_category_does_not_leak_neighbours() {
        let store = MemoryStore::new();
        store.save(&prefs()).await.unwrap();
        store
            .save(&vec![Preference::new("u1", "display_settings_extra", "x", "1")].into())
            .await
            .unwrap();

        let display = store.get_category("u1", "display_settings").await.unwrap();
        assert_eq!(display.len(), 2);
        assert!(display.iter().all(|p| p.category == "display_settings"));

        assert!(store.get_category("u3", "theme").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_save_upserts_and_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.save(&prefs()).await.unwrap();
        store
            .save(&vec![Preference::new("u1", "theme", "", "onyx")].into())
            .await
            .unwrap();

        assert_eq!(store.get("u1", "theme", "").await.unwrap().value, "onyx");

        store.delete("u1", "theme", "").await.unwrap();
        store.delete("u1", "theme", "").await.unwrap();
        assert!(matches!(
            store.get("u1", "theme", "").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_json_file_store_cleans_up_temp_file_when_rename_fails() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A directory in place of the target file makes the rename fail.
        std::fs::create_dir(temp_dir.path().join("u1.json")).unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        let mut records = UserRecords::new();
        records.insert(("theme".to_string(), String::new()), "dark".to_string());

        assert!(matches!(
            store.store("u1", &records).await,
            Err(StoreError::Io(_))
        ));
        assert!(!temp_dir.path().join("u1.json.tmp").exists());
    }

    #[test]
    fn test_json_file_store_rejects_path_like_user_ids() {
        let store = JsonFileStore::new("data");
        assert!(store.user_file("../etc/passwd").is_err());
        assert!(store.user_file("").is_err());
        assert!(store.user_file("abc123_-").is_ok());
    }
}
