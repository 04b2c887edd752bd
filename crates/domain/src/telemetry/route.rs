//! Route keys and the request data templates read from.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// The device-admin routes that produce a dedicated telemetry payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey {
    FileCreate,
    FileDelete,
    FolderCreate,
    ConfigSet,
    UserCreate,
    UserDelete,
    UserUpdate,
}

impl RouteKey {
    pub const ALL: [Self; 7] = [
        Self::FileCreate,
        Self::FileDelete,
        Self::FolderCreate,
        Self::ConfigSet,
        Self::UserCreate,
        Self::UserDelete,
        Self::UserUpdate,
    ];

    /// Route path as registered on the router.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::FileCreate => "/file/new",
            Self::FileDelete => "/file/delete",
            Self::FolderCreate => "/file/newFolder",
            Self::ConfigSet => "/ssid/set",
            Self::UserCreate => "/user/create",
            Self::UserDelete => "/user/delete/{username}",
            Self::UserUpdate => "/user/update",
        }
    }

    /// Match a route path. Both `{param}` and `:param` placeholder syntaxes
    /// are accepted.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = if path == "/user/delete/:username" {
            "/user/delete/{username}"
        } else {
            path
        };
        Self::ALL.into_iter().find(|key| key.path() == path)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Request data made available to telemetry templates.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Parsed JSON body, [`Value::Null`] when absent or not JSON.
    pub body: Value,
    /// Decoded query-string parameters.
    pub query: HashMap<String, String>,
    /// Matched path parameters.
    pub params: HashMap<String, String>,
}

impl RequestContext {
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Body field rendered as text. Strings are returned as-is, other
    /// scalars through their JSON representation.
    #[must_use]
    pub fn body_text(&self, key: &str) -> Option<String> {
        match self.body.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The acting user: body first, then query, then path parameter.
    /// Empty values are skipped.
    #[must_use]
    pub fn actor(&self) -> Option<String> {
        self.body_text("actor")
            .filter(|actor| !actor.is_empty())
            .or_else(|| self.query.get("actor").filter(|a| !a.is_empty()).cloned())
            .or_else(|| self.params.get("actor").filter(|a| !a.is_empty()).cloned())
    }
}
