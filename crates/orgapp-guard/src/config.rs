//! Event-listener configuration.
//!
//! Hosts declare which lifecycle listeners are active, and in which order,
//! through `[[event_listener]]` tables:
//!
//! ```toml
//! [[event_listener]]
//! type = "ApplicationMgtListener"
//! name = "FragmentApplicationGuard"
//! order_id = 50
//! enable = "true"
//! ```
//!
//! The `enable` value is kept as the raw string and parsed leniently: blank,
//! absent, or anything other than `true` (ignoring case) disables the listener.
//!
//! Listeners consult a [`ListenerConfigProvider`] every time they are asked
//! whether they are enabled; [`ReloadableListenerConfigs`] lets the host swap
//! the declarations at runtime without restarting.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::types::parse_bool;

/// Listener type under which application lifecycle listeners are declared.
pub const APPLICATION_MGT_LISTENER: &str = "ApplicationMgtListener";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Declaration of a single event listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventListenerConfig {
    /// Listener family, e.g. [`APPLICATION_MGT_LISTENER`].
    #[serde(rename = "type")]
    pub listener_type: String,

    /// Listener name within its family.
    pub name: String,

    /// Overrides the listener's default execution order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i32>,

    /// Raw enable flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<String>,
}

impl EventListenerConfig {
    pub fn new(listener_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            listener_type: listener_type.into(),
            name: name.into(),
            order_id: None,
            enable: None,
        }
    }

    #[must_use]
    pub fn with_enable(mut self, enable: impl Into<String>) -> Self {
        self.enable = Some(enable.into());
        self
    }

    #[must_use]
    pub fn with_order_id(mut self, order_id: i32) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Returns `true` only if `enable` is set and parses as `true`.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self.enable.as_deref() {
            Some(value) if !value.trim().is_empty() => parse_bool(value),
            _ => false,
        }
    }

    fn matches(&self, listener_type: &str, name: &str) -> bool {
        self.listener_type == listener_type && self.name == name
    }
}

/// Source of listener declarations.
pub trait ListenerConfigProvider: Send + Sync {
    /// Returns the declaration for `(listener_type, name)`, if any.
    fn listener_config(&self, listener_type: &str, name: &str) -> Option<EventListenerConfig>;
}

/// A parsed set of listener declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListenerConfigs {
    #[serde(default, rename = "event_listener")]
    listeners: Vec<EventListenerConfig>,
}

impl ListenerConfigs {
    /// Creates an empty set; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration.
    #[must_use]
    pub fn with_listener(mut self, listener: EventListenerConfig) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Parses and validates declarations from TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::InvalidValue` if validation fails.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let configs: Self = toml::from_str(input)?;
        configs.validate()?;
        Ok(configs)
    }

    /// Reads, parses and validates declarations from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`ListenerConfigs::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading listener configuration");
        Self::from_toml_str(&input)
    }

    /// Validates the declarations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - A listener type or name is empty
    /// - The same `(type, name)` pair is declared twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for listener in &self.listeners {
            if listener.listener_type.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "event_listener '{}' has an empty type",
                    listener.name
                )));
            }
            if listener.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "event_listener of type '{}' has an empty name",
                    listener.listener_type
                )));
            }
            if !seen.insert((listener.listener_type.as_str(), listener.name.as_str())) {
                return Err(ConfigError::InvalidValue(format!(
                    "event_listener '{}' of type '{}' is declared more than once",
                    listener.name, listener.listener_type
                )));
            }
        }
        Ok(())
    }

    /// Returns the declaration for `(listener_type, name)`.
    #[must_use]
    pub fn get(&self, listener_type: &str, name: &str) -> Option<&EventListenerConfig> {
        self.listeners
            .iter()
            .find(|l| l.matches(listener_type, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventListenerConfig> {
        self.listeners.iter()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl ListenerConfigProvider for ListenerConfigs {
    fn listener_config(&self, listener_type: &str, name: &str) -> Option<EventListenerConfig> {
        self.get(listener_type, name).cloned()
    }
}

/// Listener declarations that can be swapped at runtime.
///
/// Reads are lock-free; a reload replaces the whole set atomically.
#[derive(Debug, Clone)]
pub struct ReloadableListenerConfigs {
    inner: Arc<ArcSwap<ListenerConfigs>>,
}

impl ReloadableListenerConfigs {
    pub fn new(configs: ListenerConfigs) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(configs)),
        }
    }

    /// Returns the current declarations.
    #[must_use]
    pub fn current(&self) -> Arc<ListenerConfigs> {
        self.inner.load_full()
    }

    /// Replaces the declarations.
    pub fn reload(&self, configs: ListenerConfigs) {
        tracing::info!(listeners = configs.len(), "Listener configuration reloaded");
        self.inner.store(Arc::new(configs));
    }

    /// Replaces the declarations with the contents of a TOML file.
    ///
    /// The current declarations stay in place if loading fails.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ListenerConfigs::from_file`].
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let configs = ListenerConfigs::from_file(path)?;
        self.reload(configs);
        Ok(())
    }
}

impl Default for ReloadableListenerConfigs {
    fn default() -> Self {
        Self::new(ListenerConfigs::default())
    }
}

impl ListenerConfigProvider for ReloadableListenerConfigs {
    fn listener_config(&self, listener_type: &str, name: &str) -> Option<EventListenerConfig> {
        self.inner.load().get(listener_type, name).cloned()
    }
}
