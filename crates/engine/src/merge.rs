//! Per-version configuration merging and validation.
//!
//! A [`ConfigMerger`] validates a [`UserConfig`] and merges it over the
//! generation's defaults, producing the [`ResolvedConfig`] the engine runs
//! against.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::kind_of;
use crate::theme::Theme;
use crate::{ConfigError, EngineVersion, UserConfig, defaults};

/// Generation strategy requested by the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	#[default]
	Aot,
	Jit,
}

/// How the `dark` variant is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
	/// `@media (prefers-color-scheme: dark)`.
	Media,
	/// `.dark` ancestor selector.
	Class,
	/// No `dark` variant.
	Disabled,
}

/// Variant lists for classic generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VariantConfig {
	/// Built-in per-plugin lists.
	#[default]
	Defaults,
	/// One list applied to every plugin.
	Global(Vec<String>),
	/// Per-plugin replacements plus per-plugin additions.
	PerPlugin {
		lists: IndexMap<String, Vec<String>>,
		extend: IndexMap<String, Vec<String>>,
	},
}

/// Purge settings for classic generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Purge {
	pub enabled: bool,
	pub content: Vec<String>,
}

/// Which utility plugins are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorePlugins {
	#[default]
	All,
	Only(Vec<String>),
	Except(Vec<String>),
}

impl CorePlugins {
	pub fn enabled(&self, plugin: &str) -> bool {
		match self {
			Self::All => true,
			Self::Only(list) => list.iter().any(|p| p == plugin),
			Self::Except(list) => !list.iter().any(|p| p == plugin),
		}
	}
}

/// Configuration after validation and merging with the version defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
	pub version: EngineVersion,
	pub separator: String,
	pub mode: Mode,
	pub prefix: String,
	pub important: bool,
	pub dark_mode: DarkMode,
	pub theme: Theme,
	pub variants: VariantConfig,
	pub purge: Purge,
	pub content: Vec<String>,
	pub core_plugins: CorePlugins,
}

impl ResolvedConfig {
	/// Whether this configuration compiles through the JIT path.
	pub fn jit(&self) -> bool {
		match self.version {
			EngineVersion::V1 => false,
			EngineVersion::V2 => self.mode == Mode::Jit,
			EngineVersion::V3 => true,
		}
	}

	/// Classic variant list for `plugin`, given its built-in defaults.
	pub fn variants_for(&self, plugin: &str, defaults: &[&str]) -> Vec<String> {
		match &self.variants {
			VariantConfig::Defaults => defaults.iter().map(ToString::to_string).collect(),
			VariantConfig::Global(list) => list.clone(),
			VariantConfig::PerPlugin { lists, extend } => {
				let mut list = lists
					.get(plugin)
					.cloned()
					.unwrap_or_else(|| defaults.iter().map(ToString::to_string).collect());
				if let Some(extra) = extend.get(plugin) {
					for variant in extra {
						if !list.contains(variant) {
							list.push(variant.clone());
						}
					}
				}
				list
			}
		}
	}
}

/// Validates a user configuration and merges it with version defaults.
pub trait ConfigMerger: Send + Sync {
	fn merge(&self, user: &UserConfig) -> Result<ResolvedConfig, ConfigError>;
}

/// Default merger for one engine generation.
#[derive(Debug, Clone, Copy)]
pub struct VersionedMerger {
	version: EngineVersion,
}

impl VersionedMerger {
	pub const fn new(version: EngineVersion) -> Self {
		Self { version }
	}
}

impl ConfigMerger for VersionedMerger {
	fn merge(&self, user: &UserConfig) -> Result<ResolvedConfig, ConfigError> {
		let version = self.version;
		let separator = match user.get("separator") {
			None | Some(Value::Null) => ":".to_string(),
			Some(Value::String(s)) if !s.is_empty() => s.clone(),
			Some(Value::Number(n)) => n.to_string(),
			Some(other) => return Err(invalid("separator", "a non-empty string", other)),
		};
		let mode = match user.get("mode") {
			None | Some(Value::Null) => Mode::Aot,
			Some(Value::String(s)) if s == "jit" => Mode::Jit,
			Some(Value::String(s)) if s == "aot" => Mode::Aot,
			Some(other) => return Err(invalid("mode", "\"jit\" or \"aot\"", other)),
		};
		let prefix = match user.get("prefix") {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.clone(),
			Some(other) => return Err(invalid("prefix", "a string", other)),
		};
		let important = match user.get("important") {
			None | Some(Value::Null) => false,
			Some(Value::Bool(b)) => *b,
			Some(other) => return Err(invalid("important", "a boolean", other)),
		};
		let dark_mode = match (version, user.get("darkMode")) {
			(EngineVersion::V1, _) => DarkMode::Disabled,
			(EngineVersion::V2, None | Some(Value::Null)) => DarkMode::Disabled,
			(EngineVersion::V3, None | Some(Value::Null)) => DarkMode::Media,
			(_, Some(Value::Bool(false))) => DarkMode::Disabled,
			(_, Some(Value::String(s))) if s == "media" => DarkMode::Media,
			(_, Some(Value::String(s))) if s == "class" => DarkMode::Class,
			(_, Some(other)) => return Err(invalid("darkMode", "\"media\", \"class\" or false", other)),
		};

		Ok(ResolvedConfig {
			version,
			separator,
			mode,
			prefix,
			important,
			dark_mode,
			theme: merge_theme(version, user.get("theme"))?,
			variants: parse_variants(user.get("variants"))?,
			purge: parse_purge(user.get("purge"))?,
			content: parse_content(user.get("content"))?,
			core_plugins: parse_core_plugins(user.get("corePlugins"))?,
		})
	}
}

fn invalid(key: &str, expected: &str, found: &Value) -> ConfigError {
	ConfigError::new(format!("`{key}` must be {expected}, found {}", kind_of(found)))
}

fn object<'a>(key: &str, value: Option<&'a Value>) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
	match value {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Object(map)) => Ok(Some(map)),
		Some(other) => Err(invalid(key, "an object", other)),
	}
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
	let Value::Array(items) = value else {
		return Err(invalid(key, "an array of strings", value));
	};
	items
		.iter()
		.map(|item| match item {
			Value::String(s) => Ok(s.clone()),
			other => Err(invalid(key, "an array of strings", other)),
		})
		.collect()
}

/// Defaults, then top-level theme overrides, then `extend` for base keys,
/// then derived keys, then `extend` for derived keys.
fn merge_theme(version: EngineVersion, user_theme: Option<&Value>) -> Result<Theme, ConfigError> {
	let user_theme = object("theme", user_theme)?.cloned().unwrap_or_default();
	let extend = object("theme.extend", user_theme.get("extend"))?.cloned().unwrap_or_default();

	let mut theme = defaults::theme(version);
	for (key, value) in &user_theme {
		if key != "extend" {
			theme.insert(key.clone(), value.clone());
		}
	}
	for (key, value) in &extend {
		if !defaults::DERIVED_KEYS.contains(&key.as_str()) {
			deep_merge(theme.entry(key.clone()).or_insert_with(|| Value::Object(Map::new())), value);
		}
	}
	for key in defaults::DERIVED_KEYS {
		if !user_theme.contains_key(key) {
			let derived = defaults::derive(key, &theme);
			theme.insert(key.to_string(), derived);
		}
	}
	for (key, value) in &extend {
		if defaults::DERIVED_KEYS.contains(&key.as_str()) {
			deep_merge(theme.entry(key.clone()).or_insert_with(|| Value::Object(Map::new())), value);
		}
	}
	Ok(Theme::new(theme))
}

fn deep_merge(target: &mut Value, patch: &Value) {
	match (target, patch) {
		(Value::Object(target), Value::Object(patch)) => {
			for (key, value) in patch {
				match target.get_mut(key) {
					Some(existing) => deep_merge(existing, value),
					None => {
						target.insert(key.clone(), value.clone());
					}
				}
			}
		}
		(target, patch) => *target = patch.clone(),
	}
}

fn parse_variants(value: Option<&Value>) -> Result<VariantConfig, ConfigError> {
	match value {
		None | Some(Value::Null) => Ok(VariantConfig::Defaults),
		Some(list @ Value::Array(_)) => Ok(VariantConfig::Global(string_list("variants", list)?)),
		Some(Value::Object(map)) => {
			let mut lists = IndexMap::new();
			let mut extend = IndexMap::new();
			for (plugin, list) in map {
				if plugin == "extend" {
					for (plugin, list) in object("variants.extend", Some(list))?.into_iter().flatten() {
						extend.insert(plugin.clone(), string_list(&format!("variants.extend.{plugin}"), list)?);
					}
				} else {
					lists.insert(plugin.clone(), string_list(&format!("variants.{plugin}"), list)?);
				}
			}
			Ok(VariantConfig::PerPlugin { lists, extend })
		}
		Some(other) => Err(invalid("variants", "an object or an array", other)),
	}
}

fn parse_purge(value: Option<&Value>) -> Result<Purge, ConfigError> {
	match value {
		None | Some(Value::Null) => Ok(Purge::default()),
		Some(Value::Bool(enabled)) => Ok(Purge {
			enabled: *enabled,
			content: Vec::new(),
		}),
		Some(list @ Value::Array(_)) => {
			let content = string_list("purge", list)?;
			Ok(Purge {
				enabled: !content.is_empty(),
				content,
			})
		}
		Some(Value::Object(map)) => {
			let content = match map.get("content") {
				None | Some(Value::Null) => Vec::new(),
				Some(list) => string_list("purge.content", list)?,
			};
			let enabled = match map.get("enabled") {
				None | Some(Value::Null) => !content.is_empty(),
				Some(Value::Bool(b)) => *b,
				Some(other) => return Err(invalid("purge.enabled", "a boolean", other)),
			};
			Ok(Purge { enabled, content })
		}
		Some(other) => Err(invalid("purge", "a boolean, an array or an object", other)),
	}
}

fn parse_content(value: Option<&Value>) -> Result<Vec<String>, ConfigError> {
	match value {
		None | Some(Value::Null) => Ok(Vec::new()),
		Some(list @ Value::Array(_)) => string_list("content", list),
		Some(Value::Object(map)) => match map.get("files") {
			None | Some(Value::Null) => Ok(Vec::new()),
			Some(files) => string_list("content.files", files),
		},
		Some(other) => Err(invalid("content", "an array or an object", other)),
	}
}

fn parse_core_plugins(value: Option<&Value>) -> Result<CorePlugins, ConfigError> {
	match value {
		None | Some(Value::Null) => Ok(CorePlugins::All),
		Some(list @ Value::Array(_)) => Ok(CorePlugins::Only(string_list("corePlugins", list)?)),
		Some(Value::Object(map)) => Ok(CorePlugins::Except(
			map.iter()
				.filter(|(_, enabled)| matches!(enabled, Value::Bool(false)))
				.map(|(plugin, _)| plugin.clone())
				.collect(),
		)),
		Some(other) => Err(invalid("corePlugins", "an array or an object", other)),
	}
}

#[cfg(test)]
mod tests;
