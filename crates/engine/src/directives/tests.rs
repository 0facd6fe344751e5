use pretty_assertions::assert_eq;
use serde_json::json;
use windtunnel_css::parse;

use super::*;
use crate::merge::VersionedMerger;
use crate::{ConfigMerger, EngineError, EngineVersion, UserConfig};

fn config(version: EngineVersion, user: serde_json::Value) -> ResolvedConfig {
	VersionedMerger::new(version).merge(&UserConfig::try_from(user).unwrap()).unwrap()
}

#[test]
fn theme_function_reads_dotted_paths() {
	let config = config(EngineVersion::V2, json!({}));
	let mut sheet = parse(".a { color: theme('colors.red.500'); margin: theme(spacing.4) auto }").unwrap();
	resolve_theme_functions(&mut sheet, &config).unwrap();
	assert_eq!(sheet.to_string(), ".a {\n  color: #ef4444;\n  margin: 1rem auto;\n}");
}

#[test]
fn unknown_theme_path_points_at_the_declaration() {
	let config = config(EngineVersion::V2, json!({}));
	let mut sheet = parse(".a {\n  color: theme('colors.nope');\n}").unwrap();
	let Err(EngineError::CssSyntax(err)) = resolve_theme_functions(&mut sheet, &config) else {
		panic!("expected a syntax error");
	};
	assert_eq!(err.line, 2);
	assert_eq!(err.reason, "'colors.nope' does not exist in your theme config.");
}

#[test]
fn screen_becomes_min_width_media() {
	let config = config(EngineVersion::V3, json!({}));
	let mut sheet = parse("@screen md { .a { margin: 0 } }").unwrap();
	resolve_screen_rules(&mut sheet, &config).unwrap();
	assert_eq!(sheet.nodes[0].as_at_rule().unwrap().header(), "@media (min-width: 768px)");

	let mut missing = parse("@screen tablet { .a { margin: 0 } }").unwrap();
	let Err(EngineError::CssSyntax(err)) = resolve_screen_rules(&mut missing, &config) else {
		panic!("expected a syntax error");
	};
	assert_eq!(err.reason, "No `tablet` screen found.");
}

#[test]
fn scan_rejects_unknown_tailwind_params() {
	let sheet = parse("@tailwind base;\n@tailwind utilities;").unwrap();
	let found = Directives::scan(&sheet).unwrap();
	assert!(found.base && found.utilities && !found.components && !found.responsive);

	let bad = parse("@tailwind everything;").unwrap();
	assert!(matches!(Directives::scan(&bad), Err(EngineError::CssSyntax(_))));
}

#[test]
fn layers_move_to_their_directive() {
	let config = config(EngineVersion::V3, json!({}));
	let mut sheet = parse(
		"@tailwind components;\n@layer components { .btn { padding: 1rem } }\n@layer base { h1 { margin: 0 } }",
	)
	.unwrap();
	let directives = Directives::scan(&sheet).unwrap();
	let layers = collect_layers(&mut sheet, &config, &directives, None).unwrap();

	assert_eq!(layers.components.len(), 1);
	assert_eq!(layers.components[0].as_rule().unwrap().origin, Origin::Generated(Layer::Components));
	assert!(layers.base.is_empty());
	// No `@tailwind base`: the base layer stays where it was written.
	assert_eq!(sheet.nodes.len(), 2);
	assert_eq!(sheet.nodes[1].as_rule().unwrap().selector, "h1");
}

#[test]
fn invalid_layer_name_is_an_error() {
	let config = config(EngineVersion::V3, json!({}));
	let mut sheet = parse("@layer widgets { .a { margin: 0 } }").unwrap();
	let directives = Directives::scan(&sheet).unwrap();
	assert!(collect_layers(&mut sheet, &config, &directives, None).is_err());
}

#[test]
fn variants_wrapper_copies_rules_on_the_classic_path() {
	let config = config(EngineVersion::V2, json!({}));
	let registry = VariantRegistry::new(&config);
	let mut sheet = parse("@variants hover, focus { .link, .nav .item { color: red } }").unwrap();
	let directives = Directives::scan(&sheet).unwrap();
	let layers = collect_layers(&mut sheet, &config, &directives, Some(&registry)).unwrap();

	let selectors: Vec<&str> = sheet.nodes.iter().filter_map(Node::as_rule).map(|r| r.selector.as_str()).collect();
	assert_eq!(
		selectors,
		vec![
			".link, .nav .item",
			".hover\\:link:hover, .hover\\:nav .hover\\:item:hover",
			".focus\\:link:focus, .focus\\:nav .focus\\:item:focus",
		]
	);
	assert!(layers.responsive.is_empty());
}

#[test]
fn responsive_wrapper_fills_the_screens_slot() {
	let config = config(EngineVersion::V2, json!({}));
	let registry = VariantRegistry::new(&config);
	let mut sheet = parse("@responsive { .box { margin: 0 } }").unwrap();
	let directives = Directives::scan(&sheet).unwrap();
	let layers = collect_layers(&mut sheet, &config, &directives, Some(&registry)).unwrap();

	assert_eq!(sheet.nodes.len(), 1);
	let sm = &layers.responsive[0];
	assert_eq!(sm.selector, ".sm\\:box");
	assert_eq!(sm.media, vec!["(min-width: 640px)"]);
	assert!(sm.responsive);
	assert_eq!(layers.responsive.len(), registry.screens().count());
}

#[test]
fn jit_path_only_unwraps_wrappers() {
	let config = config(EngineVersion::V3, json!({}));
	let mut sheet = parse("@variants hover { .link { color: red } }").unwrap();
	let directives = Directives::scan(&sheet).unwrap();
	collect_layers(&mut sheet, &config, &directives, None).unwrap();
	assert_eq!(sheet.to_string(), ".link {\n  color: red;\n}");
}

#[test]
fn replace_class_respects_identifier_boundaries() {
	assert_eq!(replace_class(".a.ab .a:hover", "a", "x"), ".x.ab .x:hover");
}

#[test]
fn assemble_places_each_layer() {
	let mut sheet = parse("@tailwind base;\n.mid { margin: 0 }\n@tailwind utilities;").unwrap();
	let directives = Directives::scan(&sheet).unwrap();
	let content = LayerContent {
		base: vec![Node::Rule(Rule::new("html"))],
		components: vec![Node::Rule(Rule::new(".container"))],
		utilities: vec![Node::Rule(Rule::new(".p-4"))],
		responsive: vec![Node::Rule(Rule::new(".sm\\:p-4"))],
	};
	assemble(&mut sheet, &directives, content);
	let selectors: Vec<&str> = sheet.nodes.iter().filter_map(Node::as_rule).map(|r| r.selector.as_str()).collect();
	assert_eq!(selectors, vec!["html", ".mid", ".p-4", ".sm\\:p-4"]);
}

#[test]
fn assemble_without_directives_appends_utilities() {
	let mut sheet = parse(".mine { margin: 0 }").unwrap();
	let content = LayerContent {
		utilities: vec![Node::Rule(Rule::new(".p-4"))],
		..LayerContent::default()
	};
	assemble(&mut sheet, &Directives::default(), content);
	let selectors: Vec<&str> = sheet.nodes.iter().filter_map(Node::as_rule).map(|r| r.selector.as_str()).collect();
	assert_eq!(selectors, vec![".mine", ".p-4"]);
}
