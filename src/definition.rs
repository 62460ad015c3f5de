//! Repository definitions
//!
//! A [`RepositoryDefinition`] is the caller's desired state for one section
//! of a repo file: the repository id plus a map of option-name → value.
//! It is assembled once by the caller (including any override-map merge)
//! and then handed to the core immutably, so there is no hidden mutable
//! parameter state inside the reconciliation path.
//!
//! Values are kept structured until the definition is applied to a
//! document: booleans are coerced to `0`/`1`, lists are joined with single
//! spaces, scalars pass through, and [`OptionValue::Omit`] drops the key
//! entirely (this is how callers delete a single option when overriding
//! via an indirect map).
//!
//! Only options on a fixed allow-list ever reach the serialized file; all
//! others are silently dropped, whatever their value.

use std::collections::BTreeMap;

use serde_json::Value;

/// Options recognized in a repo file section.
///
/// Anything not listed here is dropped on apply, even if supplied.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "async",
    "bandwidth",
    "baseurl",
    "cost",
    "deltarpm_metadata_percentage",
    "deltarpm_percentage",
    "enabled",
    "enablegroups",
    "exclude",
    "failovermethod",
    "gpgcakey",
    "gpgcheck",
    "gpgkey",
    "http_caching",
    "include",
    "includepkgs",
    "ip_resolve",
    "keepalive",
    "keepcache",
    "metadata_expire",
    "metadata_expire_filter",
    "metalink",
    "mirrorlist",
    "mirrorlist_expire",
    "name",
    "password",
    "priority",
    "protect",
    "proxy",
    "proxy_password",
    "proxy_username",
    "repo_gpgcheck",
    "retries",
    "s3_enabled",
    "skip_if_unavailable",
    "sslcacert",
    "ssl_check_cert_permissions",
    "sslclientcert",
    "sslclientkey",
    "sslverify",
    "throttle",
    "timeout",
    "ui_repoid_vars",
    "username",
];

/// Options whose values may be given as a list and are space-joined.
pub const LIST_OPTIONS: &[&str] = &["exclude", "includepkgs"];

/// A single option value before coercion to file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Explicitly absent. The key is not written, identical to a key that
    /// was never supplied.
    Omit,
    /// Coerced to `1` (true) or `0` (false) on serialization.
    Bool(bool),
    /// Joined with single spaces on serialization.
    List(Vec<String>),
    /// Written as-is.
    Scalar(String),
}

impl OptionValue {
    /// Coerce to the string that lands in the repo file, or `None` for
    /// [`OptionValue::Omit`].
    pub fn coerce(&self) -> Option<String> {
        match self {
            OptionValue::Omit => None,
            OptionValue::Bool(true) => Some("1".to_string()),
            OptionValue::Bool(false) => Some("0".to_string()),
            OptionValue::List(items) => Some(items.join(" ")),
            OptionValue::Scalar(value) => Some(value.clone()),
        }
    }

    /// Convert a JSON value from an override map into an option value.
    ///
    /// `null` marks the key as explicitly omitted, arrays become lists,
    /// booleans stay booleans, and numbers/strings become scalars.
    pub fn from_json(value: &Value) -> OptionValue {
        match value {
            Value::Null => OptionValue::Omit,
            Value::Bool(flag) => OptionValue::Bool(*flag),
            Value::Array(items) => OptionValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::String(text) => OptionValue::Scalar(text.clone()),
            other => OptionValue::Scalar(other.to_string()),
        }
    }
}

/// Desired state for one repository section.
#[derive(Debug, Clone)]
pub struct RepositoryDefinition {
    repo_id: String,
    options: BTreeMap<String, OptionValue>,
}

impl RepositoryDefinition {
    pub fn new(repo_id: impl Into<String>) -> Self {
        RepositoryDefinition {
            repo_id: repo_id.into(),
            options: BTreeMap::new(),
        }
    }

    /// The repository id, used as the section name.
    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    /// Set a single option. Later calls for the same key win, which is how
    /// override maps replace (or omit) earlier values.
    pub fn set(&mut self, key: impl Into<String>, value: OptionValue) -> &mut Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn set_scalar(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.set(key, OptionValue::Scalar(value.into()))
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.set(key, OptionValue::Bool(value))
    }

    pub fn set_list(&mut self, key: impl Into<String>, items: Vec<String>) -> &mut Self {
        self.set(key, OptionValue::List(items))
    }

    /// Merge an override map into the definition, last writer wins.
    ///
    /// The map is the external bulk-override collaborator: a JSON object
    /// whose `null` entries delete keys from the eventual section.
    pub fn merge_overrides(&mut self, overrides: &serde_json::Map<String, Value>) -> &mut Self {
        for (key, value) in overrides {
            self.options.insert(key.clone(), OptionValue::from_json(value));
        }
        self
    }

    /// Iterate options in key order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the definition carries a usable `baseurl` or `mirrorlist`.
    ///
    /// One of the two is required when creating or updating a repository;
    /// neither is needed for removal, where only the id matters.
    pub fn has_url_source(&self) -> bool {
        ["baseurl", "mirrorlist"].iter().any(|key| {
            self.options
                .get(*key)
                .map(|value| *value != OptionValue::Omit)
                .unwrap_or(false)
        })
    }
}

/// Whether an option is on the allow-list.
pub fn is_allowed_option(key: &str) -> bool {
    ALLOWED_OPTIONS.contains(&key)
}

/// Whether an option takes a list value.
pub fn is_list_option(key: &str) -> bool {
    LIST_OPTIONS.contains(&key)
}
