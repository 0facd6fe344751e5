//! Classic (ahead-of-time) generation: every utility in every allowed
//! variant.

use crate::ResolvedConfig;
use crate::generate::{GeneratedRule, SortStrategy, sort_and_dedup};
use crate::utilities::{UtilitySet, default_variants};
use crate::variants::{Variant, VariantRegistry};

/// Enumerates the full utility layer for a configuration.
pub trait ClassicGenerator: Send + Sync {
	fn generate(&self, config: &ResolvedConfig) -> Vec<GeneratedRule>;
}

/// Walks every utility and its configured variant list. `responsive`
/// repeats the utility and all of its other variants once per screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumeratingGenerator;

impl ClassicGenerator for EnumeratingGenerator {
	fn generate(&self, config: &ResolvedConfig) -> Vec<GeneratedRule> {
		let started = std::time::Instant::now();
		let utilities = UtilitySet::new(config);
		let registry = VariantRegistry::new(config);
		let screens: Vec<&Variant> = registry.screens().collect();
		let separator = config.separator.as_str();

		let mut rules = Vec::new();
		for utility in utilities.iter() {
			let list = config.variants_for(utility.plugin, default_variants(config.version, utility.plugin));
			let responsive = list.iter().any(|v| v == "responsive");
			let mut combos: Vec<Vec<&Variant>> = vec![Vec::new()];
			combos.extend(
				list.iter()
					.filter_map(|name| registry.get(name))
					.filter(|variant| !variant.is_screen())
					.map(|variant| vec![variant]),
			);

			for combo in &combos {
				rules.push(build(utility, combo, config, separator));
				if responsive {
					for screen in &screens {
						let mut with_screen = Vec::with_capacity(combo.len() + 1);
						with_screen.push(*screen);
						with_screen.extend(combo.iter().copied());
						rules.push(build(utility, &with_screen, config, separator));
					}
				}
			}
		}

		let rules = sort_and_dedup(rules);
		tracing::debug!(
			rules = rules.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"classic utilities generated"
		);
		rules
	}
}

fn build(utility: &crate::utilities::Utility, variants: &[&Variant], config: &ResolvedConfig, separator: &str) -> GeneratedRule {
	let mut class = String::new();
	for variant in variants {
		class.push_str(&variant.name);
		class.push_str(separator);
	}
	class.push_str(&utility.class);
	GeneratedRule::from_utility(&class, utility, variants, false, &config.prefix, SortStrategy::Classic)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::merge::VersionedMerger;
	use crate::{ConfigMerger, EngineVersion, UserConfig};

	fn generate(version: EngineVersion, user: serde_json::Value) -> Vec<GeneratedRule> {
		let config = VersionedMerger::new(version).merge(&UserConfig::try_from(user).unwrap()).unwrap();
		EnumeratingGenerator.generate(&config)
	}

	#[test]
	fn screens_repeat_the_layer_after_the_base() {
		let rules = generate(EngineVersion::V2, json!({}));
		let first_media = rules.iter().position(|r| !r.media.is_empty()).unwrap();
		assert!(rules[..first_media].iter().all(|r| r.media.is_empty()));
		assert_eq!(rules[first_media].media, vec!["(min-width: 640px)"]);
		assert!(rules.iter().any(|r| r.selector == ".hover\\:text-red-500:hover"));
		assert!(rules.iter().any(|r| r.selector == ".md\\:hover\\:text-red-500:hover"));
		assert!(rules.iter().any(|r| r.selector == ".group:hover .group-hover\\:bg-blue-500"));
		assert!(!rules.iter().any(|r| r.selector.starts_with(".dark")));
		assert!(!rules.iter().any(|r| r.selector == ".hover\\:p-4:hover"));
	}

	#[test]
	fn base_rules_precede_variants_within_a_plugin() {
		let rules = generate(EngineVersion::V2, json!({}));
		let base = rules.iter().position(|r| r.selector == ".text-red-500").unwrap();
		let hover = rules.iter().position(|r| r.selector == ".hover\\:text-red-500:hover").unwrap();
		let last_base_text = rules.iter().rposition(|r| r.selector == ".text-pink-900").unwrap();
		assert!(base < hover);
		assert!(last_base_text < hover);
	}

	#[test]
	fn variant_config_controls_output() {
		let rules = generate(EngineVersion::V2, json!({ "variants": [] }));
		assert!(rules.iter().all(|r| r.media.is_empty() && !r.selector.contains(':')));

		let dark = generate(EngineVersion::V2, json!({ "darkMode": "class" }));
		assert!(dark.iter().any(|r| r.selector == ".dark .dark\\:bg-gray-900"));
	}
}
