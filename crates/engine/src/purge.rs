//! Removal of unused classic utilities.
//!
//! Runs after `@apply`, so applied declarations survive even when the
//! utility they came from is purged. Only rules generated into the
//! components and utilities layers are candidates for removal.

use rustc_hash::FxHashSet;
use windtunnel_css::{Layer, Origin, Rule, Stylesheet, selector_classes};

use crate::candidate;
use crate::separator::normalize;

/// Class tokens found in purge content.
#[derive(Debug, Clone, Default)]
pub struct PurgeSet {
	tokens: FxHashSet<String>,
}

impl PurgeSet {
	pub fn from_contents(contents: &[&str]) -> Self {
		let tokens = contents.iter().flat_map(|content| candidate::extract(content)).collect();
		Self { tokens }
	}

	pub fn contains(&self, class: &str) -> bool {
		self.tokens.contains(class)
	}

	/// Whether `rule` is kept. The deciding class of a selector part is its
	/// last class; a rule is kept when any part's class is used.
	fn keeps(&self, rule: &Rule, separator: &str) -> bool {
		if !matches!(rule.origin, Origin::Generated(Layer::Components | Layer::Utilities)) {
			return true;
		}
		let mut classes = rule
			.selector
			.split(',')
			.filter_map(|part| selector_classes(part).pop())
			.peekable();
		if classes.peek().is_none() {
			return true;
		}
		classes.any(|class| self.contains(&normalize(&class, separator)))
	}
}

/// Removes unused generated rules; returns how many rules were removed.
pub fn purge(sheet: &mut Stylesheet, used: &PurgeSet, separator: &str) -> usize {
	let before = sheet.rule_count();
	sheet.retain_rules(&mut |rule| used.keeps(rule, separator));
	let removed = before - sheet.rule_count();
	tracing::debug!(removed, kept = before - removed, "purged unused rules");
	removed
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use windtunnel_css::{AtRule, Declaration, Node};

	use super::*;
	use crate::separator::sentinel;

	fn generated(selector: &str, layer: Layer) -> Node {
		Node::Rule(
			Rule::new(selector)
				.with_declarations([Declaration::new("margin", "0")])
				.with_origin(Origin::Generated(layer)),
		)
	}

	#[test]
	fn keeps_used_generated_and_all_authored_rules() {
		let hover = format!(".hover{}p-4:hover", windtunnel_css::escape_class(&sentinel(":")));
		let mut sheet = Stylesheet::new(vec![
			generated("html", Layer::Base),
			generated(".p-4", Layer::Utilities),
			generated(".m-4", Layer::Utilities),
			generated(&hover, Layer::Utilities),
			Node::AtRule(
				AtRule::block("media", "(min-width: 640px)").with_nodes(vec![generated(".sm\\:m-4", Layer::Utilities)]),
			),
			Node::Rule(Rule::new(".unused-but-mine")),
		]);
		let used = PurgeSet::from_contents(&["<div class=\"p-4 hover:p-4\"></div>"]);
		let removed = purge(&mut sheet, &used, ":");

		assert_eq!(removed, 2);
		let selectors: Vec<&str> = sheet.nodes.iter().filter_map(Node::as_rule).map(|r| r.selector.as_str()).collect();
		assert_eq!(selectors, vec!["html", ".p-4", hover.as_str(), ".unused-but-mine"]);
	}

	#[test]
	fn group_variants_are_decided_by_their_own_class() {
		let mut sheet = Stylesheet::new(vec![generated(".group:hover .group-hover\\:p-4", Layer::Utilities)]);
		let used = PurgeSet::from_contents(&["<div class=\"group\"></div>"]);
		assert_eq!(purge(&mut sheet, &used, ":"), 1);
	}
}
