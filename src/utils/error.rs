use thiserror::Error;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;
pub const STATUS_BAD_GATEWAY: u16 = 502;

/// Errors raised by a `PreferenceStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Preference not found: user_id={user_id}, category={category}, name={name}")]
    NotFound {
        user_id: String,
        category: String,
        name: String,
    },

    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{location}: storage failure: {source}")]
    Store {
        location: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("No preferences found for user_id={user_id} in category {category}")]
    CategoryNotFound { user_id: String, category: String },

    #[error("{location}: unable to modify preferences of another user: userId={user_id}, preference.UserId={owner_id}")]
    Forbidden {
        location: &'static str,
        user_id: String,
        owner_id: String,
    },

    #[error("Event publish failed: {message}")]
    Publish { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn store(location: &'static str, source: StoreError) -> Self {
        AppError::Store { location, source }
    }

    /// HTTP status a handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Store { .. } => STATUS_BAD_REQUEST,
            AppError::CategoryNotFound { .. } => STATUS_NOT_FOUND,
            AppError::Forbidden { .. } => STATUS_FORBIDDEN,
            AppError::Publish { .. } | AppError::Http(_) => STATUS_BAD_GATEWAY,
            AppError::Config { .. }
            | AppError::MissingConfig { .. }
            | AppError::InvalidConfigValue { .. }
            | AppError::Io(_)
            | AppError::Serialization(_) => STATUS_INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable translation id, shared with clients.
    pub fn error_id(&self) -> &'static str {
        match self {
            AppError::Store { source, .. } => match source {
                StoreError::NotFound { .. } => "store.preference.get.app_error",
                _ => "store.preference.app_error",
            },
            AppError::CategoryNotFound { .. } => {
                "api.preference.preferences_category.get.app_error"
            }
            AppError::Forbidden { location, .. } if *location == "deletePreferences" => {
                "api.preference.delete_preferences.delete.app_error"
            }
            AppError::Forbidden { .. } => "api.preference.update_preferences.set.app_error",
            AppError::Publish { .. } | AppError::Http(_) => "app.publish.app_error",
            AppError::Config { .. }
            | AppError::MissingConfig { .. }
            | AppError::InvalidConfigValue { .. } => "app.config.app_error",
            AppError::Io(_) | AppError::Serialization(_) => "app.internal.app_error",
        }
    }

    /// Operation that raised the error, when known.
    pub fn location(&self) -> Option<&'static str> {
        match self {
            AppError::Store { location, .. } | AppError::Forbidden { location, .. } => {
                Some(*location)
            }
            AppError::CategoryNotFound { .. } => Some("getPreferenceCategory"),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Store { .. } => {
                "The preferences could not be read or written. Please try again.".to_string()
            }
            AppError::CategoryNotFound { category, .. } => {
                format!("No preferences are stored in category '{}'.", category)
            }
            AppError::Forbidden { .. } => {
                "You can only change your own preferences.".to_string()
            }
            AppError::MissingConfig { field } => {
                format!("Missing configuration value '{}'.", field)
            }
            AppError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    /// Process exit code used by the `prefs` binary.
    pub fn exit_code(&self) -> i32 {
        match self.status_code() {
            STATUS_BAD_REQUEST => 2,
            STATUS_FORBIDDEN => 3,
            STATUS_NOT_FOUND => 4,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let store = AppError::store(
            "getPreferences",
            StoreError::Backend {
                message: "connection reset".to_string(),
            },
        );
        assert_eq!(store.status_code(), 400);
        assert!(store.is_client_error());

        let missing = AppError::CategoryNotFound {
            user_id: "u1".to_string(),
            category: "theme".to_string(),
        };
        assert_eq!(missing.status_code(), 404);
        assert_eq!(
            missing.error_id(),
            "api.preference.preferences_category.get.app_error"
        );

        let config = AppError::Config {
            message: "bad".to_string(),
        };
        assert_eq!(config.status_code(), 500);
        assert!(!config.is_client_error());
    }

    #[test]
    fn test_forbidden_ids_depend_on_location() {
        let update = AppError::Forbidden {
            location: "savePreferences",
            user_id: "u1".to_string(),
            owner_id: "u2".to_string(),
        };
        let delete = AppError::Forbidden {
            location: "deletePreferences",
            user_id: "u1".to_string(),
            owner_id: "u2".to_string(),
        };

        assert_eq!(update.status_code(), 403);
        assert_eq!(
            update.error_id(),
            "api.preference.update_preferences.set.app_error"
        );
        assert_eq!(
            delete.error_id(),
            "api.preference.delete_preferences.delete.app_error"
        );
        assert!(update.to_string().contains("userId=u1, preference.UserId=u2"));
        assert_eq!(delete.location(), Some("deletePreferences"));
    }

    #[test]
    fn test_exit_codes() {
        let not_found = AppError::CategoryNotFound {
            user_id: "u1".to_string(),
            category: "theme".to_string(),
        };
        assert_eq!(not_found.exit_code(), 4);

        let io = AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.exit_code(), 1);
    }
}
