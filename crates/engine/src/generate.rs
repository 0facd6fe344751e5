//! Generated rules and their conversion into stylesheet nodes.

use windtunnel_css::{AtRule, Declaration, Layer, Node, Origin, Rule, escape_class};

use crate::utilities::Utility;
use crate::variants::{Variant, VariantTarget};

/// Ordering key of a generated rule; compared field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
	pub outer: Vec<usize>,
	pub plugin: usize,
	pub inner: Vec<usize>,
	pub value: usize,
}

/// Which generation strategy a rule is sorted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
	/// Screen first, then plugin, then other variants: the classic layout
	/// where every breakpoint repeats the whole utility layer.
	Classic,
	/// Variants first, then plugin: base utilities, then each variant
	/// combination, breakpoints last.
	Jit,
}

/// One rule produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRule {
	/// Class name as written in markup, unescaped.
	pub class: String,
	pub selector: String,
	/// `@media` params, outermost first.
	pub media: Vec<String>,
	/// Whether a screen variant applies; such rules go to the responsive
	/// slot of the output.
	pub responsive: bool,
	pub declarations: Vec<Declaration>,
	pub origin: Origin,
	pub sort: SortKey,
}

impl GeneratedRule {
	/// Builds the rule for `class`, the full class name including variant
	/// prefixes, from `utility` and its variants (outermost first).
	pub fn from_utility(
		class: &str,
		utility: &Utility,
		variants: &[&Variant],
		important: bool,
		prefix: &str,
		strategy: SortStrategy,
	) -> Self {
		let mut target = VariantTarget::default();
		for variant in variants.iter().rev() {
			variant.apply(&mut target, prefix);
		}
		let sort = match strategy {
			SortStrategy::Classic => SortKey {
				outer: target.screen.into_iter().collect(),
				plugin: utility.plugin_index,
				inner: target.sorted_ranks(false),
				value: utility.value_index,
			},
			SortStrategy::Jit => SortKey {
				outer: target.sorted_ranks(true),
				plugin: utility.plugin_index,
				inner: Vec::new(),
				value: utility.value_index,
			},
		};
		let declarations = utility
			.declarations
			.iter()
			.map(|decl| decl.clone().with_important(decl.important || important))
			.collect();
		Self {
			class: class.to_string(),
			selector: target.selector(&escape_class(class)),
			responsive: target.screen.is_some(),
			media: target.media,
			declarations,
			origin: Origin::Generated(Layer::Utilities),
			sort,
		}
	}
}

/// Converts sorted rules into nodes, grouping consecutive rules that share
/// the same media context into one at-rule chain.
pub fn into_nodes(rules: Vec<GeneratedRule>) -> Vec<Node> {
	let mut out: Vec<Node> = Vec::new();
	let mut group: Vec<GeneratedRule> = Vec::new();
	for rule in rules {
		if group.first().is_some_and(|first| first.media != rule.media) {
			out.extend(flush(std::mem::take(&mut group)));
		}
		group.push(rule);
	}
	out.extend(flush(group));
	out
}

fn flush(group: Vec<GeneratedRule>) -> Vec<Node> {
	let Some(first) = group.first() else {
		return Vec::new();
	};
	let media = first.media.clone();
	let origin = first.origin;
	let mut nodes: Vec<Node> = group
		.into_iter()
		.map(|rule| {
			Node::Rule(
				Rule::new(rule.selector)
					.with_declarations(rule.declarations)
					.with_origin(rule.origin),
			)
		})
		.collect();
	for params in media.iter().rev() {
		nodes = vec![Node::AtRule(AtRule::block("media", params.clone()).with_nodes(nodes).with_origin(origin))];
	}
	nodes
}

/// Sorts rules by key, keeping the first of any duplicate selector and
/// media pair.
pub fn sort_and_dedup(mut rules: Vec<GeneratedRule>) -> Vec<GeneratedRule> {
	rules.sort_by(|a, b| a.sort.cmp(&b.sort));
	let mut seen = rustc_hash::FxHashSet::default();
	rules.retain(|rule| seen.insert((rule.selector.clone(), rule.media.clone())));
	rules
}
