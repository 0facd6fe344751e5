//! Class candidates in markup.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

static CANDIDATE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"[^<>"'`\s]*[^<>"'`\s:]"#).expect("candidate pattern is valid"));

/// Unique candidate tokens in `content`, in order of first appearance.
pub fn extract(content: &str) -> IndexSet<String> {
	CANDIDATE.find_iter(content).map(|m| m.as_str().to_string()).collect()
}

/// A candidate split into variants and base utility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
	/// Variant names, outermost first.
	pub variants: Vec<&'a str>,
	/// Whether the base carried a leading `!`.
	pub important: bool,
	/// Utility class name without the `!`.
	pub base: &'a str,
}

/// Splits `raw` on `separator` outside square brackets.
///
/// Returns `None` for empty segments.
pub fn parse<'a>(raw: &'a str, separator: &str) -> Option<Candidate<'a>> {
	let mut parts = Vec::new();
	let mut depth = 0usize;
	let mut start = 0;
	let mut idx = 0;
	while idx < raw.len() {
		let rest = &raw[idx..];
		if depth == 0 && rest.starts_with(separator) {
			parts.push(&raw[start..idx]);
			idx += separator.len();
			start = idx;
			continue;
		}
		let Some(ch) = rest.chars().next() else {
			break;
		};
		match ch {
			'[' => depth += 1,
			']' => depth = depth.saturating_sub(1),
			_ => {}
		}
		idx += ch.len_utf8();
	}
	parts.push(&raw[start..]);

	let (last, variants) = parts.split_last()?;
	let (important, base) = match last.strip_prefix('!') {
		Some(base) => (true, base),
		None => (false, *last),
	};
	if base.is_empty() || variants.iter().any(|v| v.is_empty()) {
		return None;
	}
	Some(Candidate {
		variants: variants.to_vec(),
		important,
		base,
	})
}
