use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use windtunnel_css::parse;

use super::*;
use crate::jit::{ContextBuilder, StandardContextBuilder};
use crate::merge::VersionedMerger;
use crate::{ConfigMerger, EngineVersion, UserConfig};

#[test]
fn classic_apply_inlines_and_adds_variant_siblings() {
	let mut sheet = parse(
		".p-4 { padding: 1rem }\n.hover\\:p-4:hover { padding: 1rem }\n@media (min-width: 640px) { .sm\\:p-4 { padding: 1rem } }\n.btn { color: red; @apply p-4 hover:p-4 sm:p-4 !important; }",
	)
	.unwrap();
	ClassicApply.expand(&mut sheet, None).unwrap();
	let css = sheet.to_string();
	assert!(css.contains(".btn {\n  color: red;\n  padding: 1rem !important;\n}"), "{css}");
	assert!(css.contains(".btn:hover {\n  padding: 1rem !important;\n}"), "{css}");
	assert!(css.contains("@media (min-width: 640px) {\n  .btn {\n    padding: 1rem !important;\n  }\n}"), "{css}");
}

#[test]
fn missing_class_is_a_syntax_error_at_the_apply() {
	let mut sheet = parse(".btn {\n  @apply nope;\n}").unwrap();
	let err = ClassicApply.expand(&mut sheet, None).unwrap_err();
	match err {
		EngineError::CssSyntax(err) => {
			assert_eq!((err.line, err.column), (2, 3));
			assert!(err.reason.starts_with("The `nope` class does not exist."));
		}
		other => panic!("unexpected {other:?}"),
	}
}

#[test]
fn jit_apply_uses_the_context_and_user_rules() {
	let config = VersionedMerger::new(EngineVersion::V3)
		.merge(&UserConfig::try_from(json!({})).unwrap())
		.unwrap();
	let context = StandardContextBuilder { enumerable: true }.build(Arc::new(config)).unwrap();
	let mut sheet = parse(".card { margin: 0 }\n.btn, .link { @apply text-red-500 hover:bg-blue-500 card; }").unwrap();
	JitApply.expand(&mut sheet, Some(context.as_ref())).unwrap();

	let btn = sheet.nodes[1].as_rule().unwrap();
	let props: Vec<&str> = btn.declarations().map(|d| d.prop.as_str()).collect();
	assert_eq!(props, vec!["--tw-text-opacity", "color", "margin"]);
	assert_eq!(sheet.nodes[2].as_rule().unwrap().selector, ".btn:hover, .link:hover");
}

#[test]
fn jit_apply_without_context_is_a_fault() {
	let mut sheet = parse(".a { @apply p-4 }").unwrap();
	assert!(matches!(JitApply.expand(&mut sheet, None), Err(EngineError::Fault(_))));
}
