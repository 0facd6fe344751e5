//! Resolved theme access.

use serde_json::{Map, Value};

/// Resolved theme: one JSON object per theme key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme(Map<String, Value>);

impl Theme {
	pub fn new(map: Map<String, Value>) -> Self {
		Self(map)
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Flattened entries of a theme key, in declaration order.
	///
	/// Nested objects join their keys with `-`; a `DEFAULT` (or v1
	/// `default`) key names the parent itself, which flattens to the empty
	/// suffix at the top level.
	pub fn scale(&self, key: &str) -> Vec<(String, Value)> {
		let mut out = Vec::new();
		if let Some(Value::Object(map)) = self.0.get(key) {
			flatten(map, "", &mut out);
		}
		out
	}

	/// Breakpoints as `(name, min-width)` in declaration order.
	///
	/// Empty when the `screens` key is missing or not an object. Object
	/// values of the form `{ "min": "640px" }` are accepted.
	pub fn screens(&self) -> Vec<(String, String)> {
		let Some(Value::Object(map)) = self.0.get("screens") else {
			return Vec::new();
		};
		map.iter()
			.filter_map(|(name, value)| {
				let width = match value {
					Value::Object(obj) => obj.get("min").and_then(css_value)?,
					other => css_value(other)?,
				};
				Some((name.clone(), width))
			})
			.collect()
	}

	/// Names of the breakpoints, in order.
	pub fn screen_names(&self) -> Vec<String> {
		match self.0.get("screens") {
			Some(Value::Object(map)) => map.keys().cloned().collect(),
			_ => Vec::new(),
		}
	}

	/// Looks up a dotted path such as `colors.red.500` or `spacing.2.5`.
	///
	/// Keys that themselves contain dots are matched greedily; bracket
	/// segments (`spacing[2.5]`) are accepted as well.
	pub fn lookup(&self, path: &str) -> Option<String> {
		let normalized = path.trim().replace('[', ".").replace(']', "");
		let segments: Vec<&str> = normalized.split('.').filter(|s| !s.is_empty()).collect();
		let (first, rest) = segments.split_first()?;
		let root = self.0.get(*first)?;
		lookup_in(root, rest).and_then(css_value)
	}
}

fn flatten(map: &Map<String, Value>, prefix: &str, out: &mut Vec<(String, Value)>) {
	for (key, value) in map {
		let name = match (prefix, key.as_str()) {
			(p, "DEFAULT" | "default") => p.to_string(),
			("", k) => k.to_string(),
			(p, k) => format!("{p}-{k}"),
		};
		match value {
			Value::Object(nested) => flatten(nested, &name, out),
			other => out.push((name, other.clone())),
		}
	}
}

fn lookup_in<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
	if segments.is_empty() {
		return Some(value);
	}
	let Value::Object(map) = value else {
		return None;
	};
	for take in (1..=segments.len()).rev() {
		let key = segments[..take].join(".");
		if let Some(next) = map.get(&key)
			&& let Some(found) = lookup_in(next, &segments[take..])
		{
			return Some(found);
		}
	}
	None
}

/// Renders a theme value as CSS text.
///
/// Strings and numbers render as-is, arrays by their first element (font
/// sizes), objects by their `DEFAULT` entry.
pub fn css_value(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Array(items) => items.first().and_then(css_value),
		Value::Object(map) => map.get("DEFAULT").or_else(|| map.get("default")).and_then(css_value),
		Value::Bool(_) | Value::Null => None,
	}
}
