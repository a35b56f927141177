//! Builds adapters from a configuration tree.
//!
//! The tree is a nested map, usually read from a YAML or JSON file:
//!
//! ```yaml
//! event_store:
//!   default:            # config id
//!     adapter:
//!       options:
//!         dir: /var/lib/quire
//! ```
//!
//! `dir` is mandatory and must name an existing directory.

use std::path::PathBuf;

use quire_core::messaging::{
    GenericMessageFactory, MessageConverter, MessageFactory, NoOpMessageConverter,
};
use serde_json::Value;

use crate::adapter::DocumentEventStoreAdapter;
use crate::error::ConfigurationError;

/// Config id used when none is given.
pub const DEFAULT_CONFIG_ID: &str = "default";

const DIMENSION: &str = "event_store";

/// Options read from `event_store.<config_id>.adapter.options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Root directory holding one collection per stream.
    pub dir: PathBuf,
}

/// Parses a YAML configuration source into a tree.
///
/// # Errors
///
/// Returns `ConfigurationError::Yaml` if the source is not valid YAML.
pub fn config_from_yaml(source: &str) -> Result<Value, ConfigurationError> {
    Ok(serde_yaml::from_str(source)?)
}

/// Parses a JSON configuration source into a tree.
///
/// # Errors
///
/// Returns `ConfigurationError::Json` if the source is not valid JSON.
pub fn config_from_json(source: &str) -> Result<Value, ConfigurationError> {
    Ok(serde_json::from_str(source)?)
}

/// Creates `DocumentEventStoreAdapter`s for one config id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStoreAdapterFactory {
    config_id: String,
}

impl Default for EventStoreAdapterFactory {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_ID)
    }
}

impl EventStoreAdapterFactory {
    /// Creates a factory reading the options of `config_id`.
    #[must_use]
    pub fn new(config_id: impl Into<String>) -> Self {
        Self {
            config_id: config_id.into(),
        }
    }

    /// The config id whose options this factory reads.
    #[must_use]
    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Reads this factory's adapter options from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MandatoryOptionNotFound` naming the
    /// first missing level of the path, or `InvalidOption` if `dir` is not a
    /// non-empty string.
    pub fn options(&self, config: &Value) -> Result<AdapterOptions, ConfigurationError> {
        let path = [DIMENSION, self.config_id.as_str(), "adapter", "options", "dir"];
        let mut node = config;
        for (depth, segment) in path.iter().enumerate() {
            node = node
                .get(segment)
                .filter(|value| !value.is_null())
                .ok_or_else(|| ConfigurationError::MandatoryOptionNotFound {
                    option: path[..=depth].join("."),
                })?;
        }

        match node {
            Value::String(dir) if !dir.is_empty() => Ok(AdapterOptions {
                dir: PathBuf::from(dir),
            }),
            other => Err(ConfigurationError::InvalidOption {
                option: path.join("."),
                reason: format!("expected a non-empty path string, got {other}"),
            }),
        }
    }

    /// Creates an adapter for `DomainMessage` with the default helpers.
    ///
    /// # Errors
    ///
    /// Same as [`EventStoreAdapterFactory::create_with`].
    pub fn create(&self, config: &Value) -> Result<DocumentEventStoreAdapter, ConfigurationError> {
        self.create_with(config, GenericMessageFactory, NoOpMessageConverter)
    }

    /// Creates an adapter with caller-supplied message helpers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the options are missing or invalid,
    /// or if `dir` is not an existing directory.
    pub fn create_with<M, F, C>(
        &self,
        config: &Value,
        factory: F,
        converter: C,
    ) -> Result<DocumentEventStoreAdapter<M, F, C>, ConfigurationError>
    where
        F: MessageFactory<M>,
        C: MessageConverter<M>,
    {
        let AdapterOptions { dir } = self.options(config)?;
        if !dir.is_dir() {
            return Err(ConfigurationError::DirectoryNotFound { dir });
        }

        tracing::debug!(
            config_id = %self.config_id,
            dir = %dir.display(),
            "created event store adapter"
        );
        Ok(DocumentEventStoreAdapter::new(dir, factory, converter))
    }
}
