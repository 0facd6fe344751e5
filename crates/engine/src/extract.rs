//! Class and variant extraction for IntelliSense.

use indexmap::IndexMap;
use windtunnel_css::{Stylesheet, selector_classes};

use crate::color::ColorResolver;
use crate::jit::JitContext;
use crate::separator::{normalize, replace_sentinels};
use crate::state::{ClassListEntry, ClassNameEntry, IntelliSenseState, StateSeed};
use crate::variants::VariantRegistry;
use crate::ResolvedConfig;

/// Every class of every rule in `sheet`, in document order. Sentinel
/// separators are rewritten to `separator`.
pub fn extract_class_names(sheet: &Stylesheet, separator: &str) -> Vec<ClassNameEntry> {
	let mut out = Vec::new();
	for contextual in sheet.contextual_rules() {
		let rule = contextual.rule;
		let declarations: IndexMap<String, String> = rule
			.declarations()
			.map(|d| {
				let value = if d.important { format!("{} !important", d.value) } else { d.value.clone() };
				(d.prop.clone(), value)
			})
			.collect();
		if declarations.is_empty() {
			continue;
		}
		let selector = replace_sentinels(&rule.selector, separator);
		let context = contextual.context();
		let mut seen = Vec::new();
		for class in selector_classes(&rule.selector) {
			let class_name = normalize(&class, separator);
			if seen.contains(&class_name) {
				continue;
			}
			seen.push(class_name.clone());
			out.push(ClassNameEntry {
				class_name,
				selector: selector.clone(),
				context: context.clone(),
				declarations: declarations.clone(),
			});
		}
	}
	out
}

/// Completes a [`StateSeed`] with the class list, variants and screens.
///
/// The class list needs a context that enumerates its classes; colors are
/// resolved per class from the context's declarations.
pub async fn build_state(
	seed: StateSeed,
	config: &ResolvedConfig,
	context: Option<&dyn JitContext>,
	colors: &dyn ColorResolver,
) -> IntelliSenseState {
	let mut class_list = None;
	if let Some(names) = context.and_then(|c| c.class_list()) {
		let mut entries = Vec::with_capacity(names.len());
		for class_name in names {
			let color = match context.and_then(|c| c.declarations_for(&class_name)) {
				Some(declarations) => colors.resolve(&class_name, &declarations).await,
				None => None,
			};
			entries.push(ClassListEntry { class_name, color });
		}
		class_list = Some(entries);
	}

	let variants = match context {
		Some(context) => context.variant_names(),
		None => VariantRegistry::new(config).names(),
	};

	IntelliSenseState {
		jit: seed.jit,
		class_names: seed.class_names,
		class_list,
		variants,
		screens: config.theme.screen_names(),
		separator: seed.separator,
		version: seed.version,
		feature_flags: seed.feature_flags,
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use pretty_assertions::assert_eq;
	use serde_json::json;
	use windtunnel_css::parse;

	use super::*;
	use crate::color::{DeclarationColorResolver, Rgba};
	use crate::jit::{ContextBuilder, StandardContextBuilder};
	use crate::merge::VersionedMerger;
	use crate::separator::sentinel;
	use crate::{ConfigMerger, EngineVersion, UserConfig};

	fn seed(version: EngineVersion) -> StateSeed {
		StateSeed {
			jit: true,
			class_names: None,
			separator: ":".into(),
			version: version.release().into(),
			feature_flags: version.feature_flags(),
		}
	}

	#[test]
	fn class_names_normalize_the_sentinel() {
		let class = format!("hover{}p-4", sentinel("@"));
		let source = format!(
			"@media (min-width: 640px) {{ .{}:hover {{ padding: 1rem !important }} }}",
			windtunnel_css::escape_class(&class)
		);
		let sheet = parse(&source).unwrap();
		let names = extract_class_names(&sheet, "@");
		assert_eq!(names.len(), 1);
		assert_eq!(names[0].class_name, "hover@p-4");
		assert_eq!(names[0].selector, ".hover\\@p-4:hover");
		assert_eq!(names[0].context, vec!["@media (min-width: 640px)"]);
		assert_eq!(names[0].declarations["padding"], "1rem !important");
	}

	#[tokio::test]
	async fn enumerable_context_yields_colored_class_list() {
		let config = Arc::new(VersionedMerger::new(EngineVersion::V3).merge(&UserConfig::try_from(json!({})).unwrap()).unwrap());
		let context = StandardContextBuilder { enumerable: true }.build(config.clone()).unwrap();
		let state = build_state(seed(EngineVersion::V3), &config, Some(context.as_ref()), &DeclarationColorResolver).await;

		let list = state.class_list.unwrap();
		let red = list.iter().find(|e| e.class_name == "text-red-500").unwrap();
		assert_eq!(red.color, Some(Rgba::rgb(239, 68, 68)));
		let padding = list.iter().find(|e| e.class_name == "p-4").unwrap();
		assert_eq!(padding.color, None);
		assert_eq!(state.screens, vec!["sm", "md", "lg", "xl", "2xl"]);
		assert!(state.variants.iter().any(|v| v == "hover"));
	}

	#[tokio::test]
	async fn classic_state_has_no_class_list() {
		let config = VersionedMerger::new(EngineVersion::V1).merge(&UserConfig::try_from(json!({})).unwrap()).unwrap();
		let state = build_state(seed(EngineVersion::V1), &config, None, &DeclarationColorResolver).await;
		assert_eq!(state.class_list, None);
		assert_eq!(state.screens, vec!["sm", "md", "lg", "xl"]);
		assert!(state.variants.iter().any(|v| v == "group-hover"));
	}
}
