//! Validation for namespace names, store ids, and classification keys.
//!
//! Valid namespace names:
//! - Must be non-empty
//! - Lowercase ASCII letters, digits, and `-` only
//! - Must not start or end with `-`
//! - Must not contain `--`
//!
//! Classification keys are path-like (`INBOX/Courts/High Court`). Surrounding
//! whitespace and trailing `/` are trimmed; the rest must be non-empty, free of
//! control characters, and have no empty path components.

use crate::error::{RegistryError, Result};

/// Validate a namespace name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use kvr_registry::names::validate_namespace_name;
///
/// assert!(validate_namespace_name("court-of-appeal").is_ok());
/// assert!(validate_namespace_name("").is_err());
/// assert!(validate_namespace_name("Court Of Appeal").is_err());
/// ```
pub fn validate_namespace_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| RegistryError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("namespace name must not be empty"));
    }

    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must not start or end with '-'"));
    }

    if name.contains("--") {
        return Err(invalid("must not contain '--'"));
    }

    Ok(())
}

/// Validate a raw store id: non-empty and free of whitespace.
pub fn validate_store_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(RegistryError::InvalidName {
            name: id.to_string(),
            reason: "store id must not be empty".into(),
        });
    }
    if id.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidName {
            name: id.to_string(),
            reason: "store id must not contain whitespace".into(),
        });
    }
    Ok(())
}

/// Normalize a classification key for lookup.
///
/// # Examples
///
/// ```
/// use kvr_registry::names::normalize_classification_key;
///
/// assert_eq!(
///     normalize_classification_key("  INBOX/Courts/ ").unwrap(),
///     "INBOX/Courts"
/// );
/// assert!(normalize_classification_key("INBOX//Courts").is_err());
/// ```
pub fn normalize_classification_key(key: &str) -> Result<String> {
    let invalid = |reason: &str| RegistryError::InvalidClassification {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = key.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("classification key must not be empty"));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(invalid("must not contain control characters"));
    }
    if trimmed.split('/').any(str::is_empty) {
        return Err(invalid("path components must not be empty"));
    }
    Ok(trimmed.to_string())
}
