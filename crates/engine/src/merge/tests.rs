use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use super::*;

fn user(value: Value) -> UserConfig {
	UserConfig::try_from(value).unwrap()
}

fn merge(version: EngineVersion, value: Value) -> Result<ResolvedConfig, ConfigError> {
	VersionedMerger::new(version).merge(&user(value))
}

#[test]
fn defaults_per_version() {
	let v2 = merge(EngineVersion::V2, json!({})).unwrap();
	assert_eq!(v2.separator, ":");
	assert_eq!(v2.mode, Mode::Aot);
	assert_eq!(v2.dark_mode, DarkMode::Disabled);
	assert!(!v2.jit());
	assert_eq!(v2.theme.screen_names(), vec!["sm", "md", "lg", "xl", "2xl"]);

	let v3 = merge(EngineVersion::V3, json!({})).unwrap();
	assert!(v3.jit());
	assert_eq!(v3.dark_mode, DarkMode::Media);

	let v1 = merge(EngineVersion::V1, json!({ "mode": "jit", "darkMode": "class" })).unwrap();
	assert!(!v1.jit());
	assert_eq!(v1.dark_mode, DarkMode::Disabled);
	assert_eq!(v1.theme.screen_names(), vec!["sm", "md", "lg", "xl"]);
}

#[test]
fn jit_is_opt_in_for_v2() {
	let config = merge(EngineVersion::V2, json!({ "mode": "jit" })).unwrap();
	assert!(config.jit());
}

#[test]
fn invalid_values_are_config_errors() {
	let err = merge(EngineVersion::V2, json!({ "separator": [] })).unwrap_err();
	assert_eq!(err.message, "`separator` must be a non-empty string, found an array");
	assert!(merge(EngineVersion::V2, json!({ "mode": "fast" })).is_err());
	assert!(merge(EngineVersion::V3, json!({ "darkMode": "auto" })).is_err());
	assert!(merge(EngineVersion::V2, json!({ "theme": "dark" })).is_err());
	assert!(merge(EngineVersion::V2, json!({ "purge": 3 })).is_err());
}

#[test]
fn extend_spacing_flows_into_derived_keys() {
	let config = merge(EngineVersion::V2, json!({ "theme": { "extend": { "spacing": { "72": "18rem" }, "margin": { "huge": "40rem" } } } })).unwrap();
	assert_eq!(config.theme.lookup("margin.72").as_deref(), Some("18rem"));
	assert_eq!(config.theme.lookup("padding.72").as_deref(), Some("18rem"));
	assert_eq!(config.theme.lookup("margin.huge").as_deref(), Some("40rem"));
	assert_eq!(config.theme.lookup("margin.auto").as_deref(), Some("auto"));
}

#[test]
fn theme_override_replaces_the_key() {
	let config = merge(EngineVersion::V2, json!({ "theme": { "colors": { "brand": "#123456" } } })).unwrap();
	let names: Vec<String> = config.theme.scale("textColor").into_iter().map(|(name, _)| name).collect();
	assert_eq!(names, vec!["brand"]);
}

#[test]
fn variant_lists() {
	let config = merge(
		EngineVersion::V2,
		json!({ "variants": { "opacity": ["hover"], "extend": { "textColor": ["active"] } } }),
	)
	.unwrap();
	assert_eq!(config.variants_for("opacity", &["responsive"]), vec!["hover"]);
	assert_eq!(config.variants_for("textColor", &["responsive", "hover"]), vec!["responsive", "hover", "active"]);
	assert_eq!(config.variants_for("display", &["responsive"]), vec!["responsive"]);

	let global = merge(EngineVersion::V2, json!({ "variants": [] })).unwrap();
	assert!(global.variants_for("textColor", &["responsive"]).is_empty());
}

#[test]
fn purge_forms() {
	assert_eq!(merge(EngineVersion::V2, json!({})).unwrap().purge, Purge::default());
	assert!(merge(EngineVersion::V2, json!({ "purge": true })).unwrap().purge.enabled);
	assert!(merge(EngineVersion::V2, json!({ "purge": ["./src/**/*.html"] })).unwrap().purge.enabled);
	let off = merge(EngineVersion::V2, json!({ "purge": { "enabled": false, "content": ["a"] } })).unwrap();
	assert!(!off.purge.enabled);
	assert_eq!(off.purge.content, vec!["a"]);
}

#[test]
fn core_plugins_forms() {
	let only = merge(EngineVersion::V2, json!({ "corePlugins": ["margin"] })).unwrap();
	assert!(only.core_plugins.enabled("margin"));
	assert!(!only.core_plugins.enabled("padding"));
	let except = merge(EngineVersion::V2, json!({ "corePlugins": { "padding": false } })).unwrap();
	assert!(except.core_plugins.enabled("margin"));
	assert!(!except.core_plugins.enabled("padding"));
}
