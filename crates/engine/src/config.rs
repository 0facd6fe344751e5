//! User framework configuration and the resolver capability.
//!
//! The configuration document is opaque to the pipeline: a [`ConfigResolver`]
//! turns the raw source into a [`UserConfig`] object, and the per-version
//! [`ConfigMerger`](crate::ConfigMerger) validates and resolves it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ConfigError, EngineVersion};

/// Raw configuration as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigSource {
	/// Source text of the configuration document.
	Text(String),
	/// Already structured document.
	Document(Value),
}

impl Default for ConfigSource {
	fn default() -> Self {
		Self::Text(String::new())
	}
}

impl From<&str> for ConfigSource {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for ConfigSource {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

/// Parsed but unresolved configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserConfig(Map<String, Value>);

impl UserConfig {
	pub fn new(map: Map<String, Value>) -> Self {
		Self(map)
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn set(&mut self, key: impl Into<String>, value: Value) {
		self.0.insert(key.into(), value);
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}
}

impl TryFrom<Value> for UserConfig {
	type Error = ConfigError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			Value::Null => Ok(Self::default()),
			other => Err(ConfigError::new(format!("Config must be an object, found {}", kind_of(&other)))),
		}
	}
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Turns raw configuration into a [`UserConfig`].
#[async_trait]
pub trait ConfigResolver: Send + Sync {
	async fn resolve(&self, source: &ConfigSource, version: EngineVersion) -> Result<UserConfig, ConfigError>;
}

/// Resolver for JSON configuration documents.
///
/// Empty source text resolves to the empty configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConfigResolver;

#[async_trait]
impl ConfigResolver for JsonConfigResolver {
	async fn resolve(&self, source: &ConfigSource, version: EngineVersion) -> Result<UserConfig, ConfigError> {
		let value = match source {
			ConfigSource::Text(text) if text.trim().is_empty() => return Ok(UserConfig::default()),
			ConfigSource::Text(text) => serde_json::from_str::<Value>(text).map_err(|err| {
				tracing::warn!(%version, line = err.line(), "config parse failed");
				ConfigError::new(err.to_string()).with_line(err.line() as u32)
			})?,
			ConfigSource::Document(value) => value.clone(),
		};
		UserConfig::try_from(value)
	}
}
