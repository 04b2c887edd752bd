//! Device administration records — users, file catalog entries and device
//! configuration managed through the admin routes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// A local user account and its permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    #[serde(default)]
    pub permissions: Value,
}

impl UserAccount {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `username` is blank.
    pub fn new(username: impl Into<String>, permissions: Value) -> Result<Self, ValidationError> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            return Err(ValidationError::MissingField("username"));
        }
        Ok(Self {
            username,
            permissions,
        })
    }
}

/// A file or folder known to the device's content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    #[serde(default)]
    pub folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CatalogEntry {
    /// A file named `name` inside `dir` (the catalog root when empty).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `name` is blank.
    pub fn file(
        dir: &str,
        name: &str,
        size: u64,
        kind: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim().trim_matches('/');
        if name.is_empty() {
            return Err(ValidationError::MissingField("file.name"));
        }
        Ok(Self {
            path: join(dir, name),
            folder: false,
            size: Some(size),
            kind,
        })
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `path` is blank.
    pub fn folder(path: &str) -> Result<Self, ValidationError> {
        let path = normalize(path);
        if path == "/" {
            return Err(ValidationError::MissingField("path"));
        }
        Ok(Self {
            path,
            folder: true,
            size: None,
            kind: None,
        })
    }
}

/// Collapse a user supplied path into `/a/b` form.
#[must_use]
pub fn normalize(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.trim().is_empty()).collect();
    format!("/{}", parts.join("/"))
}

fn join(dir: &str, name: &str) -> String {
    let dir = normalize(dir);
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Validate and trim a Wi-Fi network name.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when the trimmed name is empty.
pub fn ssid(raw: &str) -> Result<String, ValidationError> {
    let ssid = raw.trim();
    if ssid.is_empty() {
        return Err(ValidationError::MissingField("ssid"));
    }
    Ok(ssid.to_string())
}
