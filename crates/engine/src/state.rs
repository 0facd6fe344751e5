//! IntelliSense state produced alongside a compile.

use indexmap::IndexMap;
use serde::Serialize;

use crate::FeatureFlags;
use crate::color::Rgba;

/// One class found in an unpurged compile pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNameEntry {
	pub class_name: String,
	pub selector: String,
	/// Enclosing at-rule headers, outermost first.
	pub context: Vec<String>,
	pub declarations: IndexMap<String, String>,
}

/// One enumerable class and its preview color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassListEntry {
	pub class_name: String,
	pub color: Option<Rgba>,
}

/// The synchronous part of the state, produced inside the compile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSeed {
	pub jit: bool,
	/// Absent when no unpurged tree was available, e.g. on the v3 path.
	pub class_names: Option<Vec<ClassNameEntry>>,
	pub separator: String,
	/// Release string of the engine generation.
	pub version: String,
	pub feature_flags: FeatureFlags,
}

/// Long-lived IntelliSense state, replaced on every committed compile that
/// asked for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelliSenseState {
	pub jit: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub class_names: Option<Vec<ClassNameEntry>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub class_list: Option<Vec<ClassListEntry>>,
	pub variants: Vec<String>,
	pub screens: Vec<String>,
	pub separator: String,
	pub version: String,
	pub feature_flags: FeatureFlags,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn class_name_entries_serialize_declarations_in_order() {
		let entry = ClassNameEntry {
			class_name: "px-4".into(),
			selector: ".px-4".into(),
			context: vec!["@media (min-width: 640px)".into()],
			declarations: IndexMap::from([
				("padding-right".to_string(), "1rem".to_string()),
				("padding-left".to_string(), "1rem".to_string()),
			]),
		};
		let value = serde_json::to_value(&entry).unwrap();
		assert_eq!(value, json!({
			"className": "px-4",
			"selector": ".px-4",
			"context": ["@media (min-width: 640px)"],
			"declarations": { "padding-right": "1rem", "padding-left": "1rem" },
		}));
		let keys: Vec<_> = value["declarations"].as_object().unwrap().keys().cloned().collect();
		assert_eq!(keys, ["padding-right", "padding-left"]);
	}
}
