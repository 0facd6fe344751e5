//! Custom separator handling for classic generation.
//!
//! Classic generation builds class names with a sentinel-wrapped separator
//! (`__TWSEP__{sep}__TWSEP__`) so any separator survives escaping. Before
//! the apply step, [`SelectorRewrite::strip`] unwraps the sentinel in every
//! selector, recording the original selector in a marker comment placed
//! right before the rule; [`SelectorRewrite::restore`] puts the originals
//! back afterwards. The final CSS text has every sentinel run replaced by
//! the escaped separator through [`replace_sentinels`].

use std::sync::LazyLock;

use regex::{Captures, Regex};
use windtunnel_css::{Comment, Node, Stylesheet};

pub const SENTINEL_DELIMITER: &str = "__TWSEP__";

const MARKER: &str = "__ORIGINAL_SELECTOR__:";

static SENTINEL_RUN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new("__TWSEP__(.*?)__TWSEP__").expect("sentinel pattern is valid"));

/// Wraps `separator` in the sentinel delimiter.
pub fn sentinel(separator: &str) -> String {
	format!("{SENTINEL_DELIMITER}{separator}{SENTINEL_DELIMITER}")
}

/// Backslash-escapes every character of `separator` outside
/// `[a-zA-Z0-9_-]`.
pub fn escape_separator(separator: &str) -> String {
	let mut out = String::with_capacity(separator.len() * 2);
	for ch in separator.chars() {
		if !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_') {
			out.push('\\');
		}
		out.push(ch);
	}
	out
}

/// Replaces every sentinel run in compiled CSS with the escaped separator.
pub fn replace_sentinels(css: &str, separator: &str) -> String {
	let escaped = escape_separator(separator);
	SENTINEL_RUN.replace_all(css, regex::NoExpand(&escaped)).into_owned()
}

/// Replaces every sentinel run with the raw separator, for comparing class
/// names against markup.
pub fn normalize(text: &str, separator: &str) -> String {
	SENTINEL_RUN.replace_all(text, regex::NoExpand(separator)).into_owned()
}

/// Scoped rewrite of sentinel selectors around the classic apply step.
#[derive(Debug, Default)]
pub struct SelectorRewrite {
	rewritten: usize,
}

impl SelectorRewrite {
	/// Unwraps sentinel runs in every rule selector, keeping the escaped
	/// inner separator, and records the originals.
	pub fn strip(sheet: &mut Stylesheet) -> Self {
		let mut rewrite = Self::default();
		rewrite.strip_nodes(&mut sheet.nodes);
		rewrite
	}

	fn strip_nodes(&mut self, nodes: &mut Vec<Node>) {
		let mut idx = 0;
		while idx < nodes.len() {
			let mut marker = None;
			match &mut nodes[idx] {
				Node::Rule(rule) => {
					let stripped = SENTINEL_RUN.replace_all(&rule.selector, |caps: &Captures<'_>| caps[1].to_string());
					if stripped != rule.selector {
						marker = Some(Comment::new(format!("{MARKER}{}", rule.selector)));
						rule.selector = stripped.into_owned();
					}
					self.strip_nodes(&mut rule.nodes);
				}
				Node::AtRule(at) => {
					if let Some(children) = at.nodes.as_mut() {
						self.strip_nodes(children);
					}
				}
				Node::Decl(_) | Node::Comment(_) => {}
			}
			if let Some(comment) = marker {
				nodes.insert(idx, Node::Comment(comment));
				self.rewritten += 1;
				idx += 1;
			}
			idx += 1;
		}
	}

	/// Number of selectors rewritten by [`strip`](Self::strip).
	pub fn rewritten(&self) -> usize {
		self.rewritten
	}

	/// Restores the recorded selectors and removes the marker comments.
	pub fn restore(self, sheet: &mut Stylesheet) {
		restore_nodes(&mut sheet.nodes);
	}
}

fn restore_nodes(nodes: &mut Vec<Node>) {
	let mut idx = 0;
	while idx < nodes.len() {
		let original = match &nodes[idx] {
			Node::Comment(comment) => comment.text.strip_prefix(MARKER).map(str::to_string),
			_ => None,
		};
		if let Some(original) = original {
			if let Some(Node::Rule(rule)) = nodes.get_mut(idx + 1) {
				rule.selector = original;
			}
			nodes.remove(idx);
			continue;
		}
		match &mut nodes[idx] {
			Node::Rule(rule) => restore_nodes(&mut rule.nodes),
			Node::AtRule(at) => {
				if let Some(children) = at.nodes.as_mut() {
					restore_nodes(children);
				}
			}
			Node::Decl(_) | Node::Comment(_) => {}
		}
		idx += 1;
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use windtunnel_css::{AtRule, Declaration, Rule, escape_class};

	use super::*;

	#[test]
	fn escapes_separator_characters() {
		assert_eq!(escape_separator(":"), "\\:");
		assert_eq!(escape_separator("::"), "\\:\\:");
		assert_eq!(escape_separator("_"), "_");
		assert_eq!(escape_separator("@$"), "\\@\\$");
	}

	#[test]
	fn replaces_escaped_sentinel_runs() {
		let class = format!("hover{}text-red-500", sentinel("@"));
		let css = format!(".{} {{ color: red }}", escape_class(&class));
		assert_eq!(replace_sentinels(&css, "@"), ".hover\\@text-red-500 { color: red }");
		assert!(!replace_sentinels(&css, "@").contains(SENTINEL_DELIMITER));
	}

	#[test]
	fn underscore_separator_survives() {
		let class = format!("md{}p-4", sentinel("_"));
		assert_eq!(replace_sentinels(&escape_class(&class), "_"), "md_p-4");
		assert_eq!(normalize(&class, "_"), "md_p-4");
	}

	#[test]
	fn strip_and_restore_round_trip() {
		let selector = format!(".{}", escape_class(&format!("hover{}p-4", sentinel(":"))));
		let mut sheet = Stylesheet::new(vec![
			Node::Rule(Rule::new(".plain").with_declarations([Declaration::new("a", "b")])),
			Node::AtRule(AtRule::block("media", "(min-width: 640px)").with_nodes(vec![Node::Rule(
				Rule::new(selector.clone()).with_declarations([Declaration::new("padding", "1rem")]),
			)])),
		]);
		let original = sheet.clone();

		let rewrite = SelectorRewrite::strip(&mut sheet);
		assert_eq!(rewrite.rewritten(), 1);
		let media = sheet.nodes[1].as_at_rule().unwrap().nodes.as_ref().unwrap();
		assert_eq!(media.len(), 2);
		assert_eq!(media[1].as_rule().unwrap().selector, ".hover\\:p-4");

		rewrite.restore(&mut sheet);
		assert_eq!(sheet, original);
	}
}
