use anyhow::Result;
use tempfile::TempDir;
use user_preferences::core::PreferenceStore;
use user_preferences::{JsonFileStore, Preference, Preferences, StoreError};

fn sample() -> Preferences {
    vec![
        Preference::new("u1", "theme", "", "dark"),
        Preference::new("u1", "notifications", "email", "false"),
        Preference::new("u1", "notifications", "push", "mention"),
    ]
    .into()
}

#[tokio::test]
async fn test_save_persists_one_file_per_user() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileStore::new(temp_dir.path().join("prefs"));

    store.save(&sample()).await?;
    store
        .save(&vec![Preference::new("u2", "theme", "", "light")].into())
        .await?;

    assert!(temp_dir.path().join("prefs/u1.json").exists());
    assert!(temp_dir.path().join("prefs/u2.json").exists());

    let raw = std::fs::read_to_string(temp_dir.path().join("prefs/u1.json"))?;
    let on_disk = Preferences::from_json(&raw)?;
    assert_eq!(on_disk.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_reopened_store_sees_previous_writes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    JsonFileStore::new(temp_dir.path()).save(&sample()).await?;

    let reopened = JsonFileStore::new(temp_dir.path());
    let notifications = reopened.get_category("u1", "notifications").await?;
    let names: Vec<&str> = notifications.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["email", "push"]);

    let theme = reopened.get("u1", "theme", "").await?;
    assert_eq!(theme.value, "dark");
    Ok(())
}

#[tokio::test]
async fn test_missing_user_reads_as_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileStore::new(temp_dir.path());

    assert!(store.get_all("ghost").await?.is_empty());
    assert!(store.get_category("ghost", "theme").await?.is_empty());
    assert!(matches!(
        store.get("ghost", "theme", "").await,
        Err(StoreError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_deleting_last_record_removes_the_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileStore::new(temp_dir.path());
    store
        .save(&vec![Preference::new("u1", "last", "channel", "town-square")].into())
        .await?;

    store.delete("u1", "last", "channel").await?;
    store.delete("u1", "last", "channel").await?;

    assert!(!temp_dir.path().join("u1.json").exists());
    assert!(store.get_all("u1").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_is_a_serialization_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("u1.json"), "{ definitely not an array")?;
    let store = JsonFileStore::new(temp_dir.path());

    assert!(matches!(
        store.get_all("u1").await,
        Err(StoreError::Serialization(_))
    ));
    Ok(())
}
