use crate::utils::error::{AppError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(AppError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(AppError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Allowed values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AppError::MissingConfig {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("events.webhook_url", "https://example.com/hook").is_ok());
        assert!(validate_url("events.webhook_url", "http://localhost:8065").is_ok());
        assert!(validate_url("events.webhook_url", "").is_err());
        assert!(validate_url("events.webhook_url", "not a url").is_err());
        assert!(validate_url("events.webhook_url", "ws://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.data_dir", "./data").is_ok());
        assert!(validate_path("storage.data_dir", "  ").is_err());
        assert!(validate_path("storage.data_dir", "a\0b").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("events.buffer_size", 1usize, 1, 65_536).is_ok());
        assert!(validate_range("events.buffer_size", 65_536usize, 1, 65_536).is_ok());
        assert!(validate_range("events.buffer_size", 0usize, 1, 65_536).is_err());
        assert!(validate_range("events.buffer_size", 65_537usize, 1, 65_536).is_err());
    }

    #[test]
    fn test_validate_one_of_and_required() {
        assert!(validate_one_of("storage.backend", "file", &["file", "memory"]).is_ok());
        assert!(validate_one_of("storage.backend", "sql", &["file", "memory"]).is_err());

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("user", &missing),
            Err(AppError::MissingConfig { .. })
        ));
    }
}
