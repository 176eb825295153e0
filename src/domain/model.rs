use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CATEGORY_DIRECT_CHANNEL_SHOW: &str = "direct_channel_show";
pub const CATEGORY_TUTORIAL_STEPS: &str = "tutorial_step";
pub const CATEGORY_ADVANCED_SETTINGS: &str = "advanced_settings";
pub const CATEGORY_FLAGGED_POST: &str = "flagged_post";
pub const CATEGORY_DISPLAY_SETTINGS: &str = "display_settings";
pub const CATEGORY_THEME: &str = "theme";
pub const CATEGORY_NOTIFICATIONS: &str = "notifications";
pub const CATEGORY_LAST: &str = "last";

/// Key of the event payload entry that carries the affected preferences.
pub const EVENT_DATA_PREFERENCES: &str = "preferences";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub user_id: String,
    pub category: String,
    pub name: String,
    pub value: String,
}

impl Preference {
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(pub Vec<Preference>);

impl Preferences {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Preference> {
        self.0.iter()
    }

    pub fn push(&mut self, preference: Preference) {
        self.0.push(preference);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

impl From<Vec<Preference>> for Preferences {
    fn from(preferences: Vec<Preference>) -> Self {
        Self(preferences)
    }
}

impl FromIterator<Preference> for Preferences {
    fn from_iter<I: IntoIterator<Item = Preference>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Preferences {
    type Item = Preference;
    type IntoIter = std::vec::IntoIter<Preference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Preferences {
    type Item = &'a Preference;
    type IntoIter = std::slice::Iter<'a, Preference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PreferencesChanged,
    PreferencesDeleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PreferencesChanged => "preferences_changed",
            EventKind::PreferencesDeleted => "preferences_deleted",
        }
    }
}

/// Audience of an event. Empty fields do not narrow the audience.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    pub user_id: String,
    pub channel_id: String,
    pub team_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketEvent {
    pub event: EventKind,
    pub data: HashMap<String, serde_json::Value>,
    pub broadcast: Broadcast,
    pub timestamp: DateTime<Utc>,
}

impl WebSocketEvent {
    pub fn new(event: EventKind, team_id: &str, channel_id: &str, user_id: &str) -> Self {
        Self {
            event,
            data: HashMap::new(),
            broadcast: Broadcast {
                user_id: user_id.to_string(),
                channel_id: channel_id.to_string(),
                team_id: team_id.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    /// Event addressed to a single user, carrying `preferences` as a JSON
    /// string under the `preferences` key.
    pub fn for_preferences(
        event: EventKind,
        user_id: &str,
        preferences: &Preferences,
    ) -> serde_json::Result<Self> {
        let mut message = Self::new(event, "", "", user_id);
        message.add(EVENT_DATA_PREFERENCES, preferences.to_json()?);
        Ok(message)
    }

    pub fn add(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Decodes the preferences carried by this event, if any.
    pub fn preferences(&self) -> Option<Preferences> {
        self.data
            .get(EVENT_DATA_PREFERENCES)
            .and_then(|v| v.as_str())
            .and_then(|raw| Preferences::from_json(raw).ok())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
