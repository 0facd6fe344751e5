//! Stylesheet directives.
//!
//! `theme()` calls and `@screen` are resolved first. `@layer` blocks move
//! their rules into the layer emitted at the matching `@tailwind`
//! directive, and `@responsive` / `@variants` wrappers produce variant
//! copies of the rules they wrap on the classic path. Finally every
//! `@tailwind` directive is replaced with its layer.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use windtunnel_css::{CssSyntaxError, Layer, Node, Origin, Rule, Stylesheet, escape_class, selector_classes};

use crate::generate::{GeneratedRule, SortKey, into_nodes, sort_and_dedup};
use crate::variants::{Variant, VariantRegistry, VariantTarget};
use crate::{ResolvedConfig, Result};

static THEME_FN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"theme\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("theme() pattern is valid"));

/// Replaces `theme('path')` in declaration values.
pub fn resolve_theme_functions(sheet: &mut Stylesheet, config: &ResolvedConfig) -> Result<()> {
	sheet.try_walk_decls_mut(&mut |decl| {
		if !decl.value.contains("theme(") {
			return Ok(());
		}
		let mut missing: Option<String> = None;
		let replaced = THEME_FN.replace_all(&decl.value, |caps: &Captures<'_>| match config.theme.lookup(&caps[1]) {
			Some(value) => value,
			None => {
				missing.get_or_insert_with(|| caps[1].trim().to_string());
				String::new()
			}
		});
		if let Some(path) = missing {
			return Err(CssSyntaxError::at(format!("'{path}' does not exist in your theme config."), decl.source));
		}
		decl.value = replaced.into_owned();
		Ok(())
	})?;
	Ok(())
}

/// Rewrites `@screen name` into the matching `@media (min-width: ...)`.
pub fn resolve_screen_rules(sheet: &mut Stylesheet, config: &ResolvedConfig) -> Result<()> {
	let screens = config.theme.screens();
	rewrite_screens(&mut sheet.nodes, &screens)?;
	Ok(())
}

fn rewrite_screens(nodes: &mut [Node], screens: &[(String, String)]) -> std::result::Result<(), CssSyntaxError> {
	for node in nodes {
		match node {
			Node::AtRule(at) => {
				if at.name == "screen" {
					let name = at.params.trim();
					let Some((_, width)) = screens.iter().find(|(screen, _)| screen == name) else {
						return Err(CssSyntaxError::at(format!("No `{name}` screen found."), at.source));
					};
					at.name = "media".into();
					at.params = format!("(min-width: {width})");
				}
				if let Some(children) = at.nodes.as_mut() {
					rewrite_screens(children, screens)?;
				}
			}
			Node::Rule(rule) => rewrite_screens(&mut rule.nodes, screens)?,
			Node::Decl(_) | Node::Comment(_) => {}
		}
	}
	Ok(())
}

/// Which `@tailwind` directives the stylesheet contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directives {
	pub base: bool,
	pub components: bool,
	pub utilities: bool,
	/// `@tailwind screens` or `@tailwind variants`.
	pub responsive: bool,
}

impl Directives {
	/// Scans top-level `@tailwind` rules.
	pub fn scan(sheet: &Stylesheet) -> Result<Self> {
		let mut found = Self::default();
		for at in sheet.nodes.iter().filter_map(Node::as_at_rule).filter(|at| at.name == "tailwind") {
			match at.params.trim() {
				"base" => found.base = true,
				"components" => found.components = true,
				"utilities" => found.utilities = true,
				"screens" | "variants" => found.responsive = true,
				other => {
					return Err(CssSyntaxError::at(
						format!("`@tailwind {other}` is invalid. Use `base`, `components`, `utilities` or `variants`."),
						at.source,
					)
					.into());
				}
			}
		}
		Ok(found)
	}

	pub fn any(&self) -> bool {
		self.base || self.components || self.utilities || self.responsive
	}

	fn has(&self, layer: Layer) -> bool {
		match layer {
			Layer::Base => self.base,
			Layer::Components => self.components,
			Layer::Utilities => self.utilities || !self.any(),
		}
	}
}

/// Authored rules collected from `@layer` blocks and wrapper variants.
#[derive(Debug, Default)]
pub struct AuthoredLayers {
	pub base: Vec<Node>,
	pub components: Vec<Node>,
	pub utilities: Vec<Node>,
	/// Screen copies produced by `@responsive` / `@variants responsive`.
	pub responsive: Vec<GeneratedRule>,
}

impl AuthoredLayers {
	fn bucket(&mut self, layer: Layer) -> &mut Vec<Node> {
		match layer {
			Layer::Base => &mut self.base,
			Layer::Components => &mut self.components,
			Layer::Utilities => &mut self.utilities,
		}
	}
}

struct Wrappers<'a> {
	registry: Option<&'a VariantRegistry>,
	separator: &'a str,
	prefix: &'a str,
	sequence: usize,
}

/// Pulls `@layer` blocks out of the tree and expands `@responsive` /
/// `@variants`. Wrappers are only unwrapped when `registry` is absent (the
/// JIT path).
///
/// Layer content whose `@tailwind` directive is missing stays in place.
pub fn collect_layers(
	sheet: &mut Stylesheet,
	config: &ResolvedConfig,
	directives: &Directives,
	registry: Option<&VariantRegistry>,
) -> Result<AuthoredLayers> {
	let mut layers = AuthoredLayers::default();
	let mut wrappers = Wrappers {
		registry,
		separator: &config.separator,
		prefix: &config.prefix,
		sequence: 0,
	};
	let mut out = Vec::with_capacity(sheet.nodes.len());
	for node in std::mem::take(&mut sheet.nodes) {
		match node {
			Node::AtRule(at) if at.name == "layer" => {
				let layer = match at.params.trim() {
					"base" => Layer::Base,
					"components" => Layer::Components,
					"utilities" => Layer::Utilities,
					other => {
						return Err(CssSyntaxError::at(
							format!("`@layer {other}` is invalid. Use `base`, `components` or `utilities`."),
							at.source,
						)
						.into());
					}
				};
				let origin = Origin::Generated(layer);
				let mut expanded = Vec::new();
				for child in at.nodes.unwrap_or_default() {
					expanded.extend(wrappers.expand(child, origin, &mut layers.responsive));
				}
				mark(&mut expanded, origin);
				if directives.has(layer) {
					layers.bucket(layer).extend(expanded);
				} else {
					out.extend(expanded);
				}
			}
			other => out.extend(wrappers.expand(other, Origin::Authored, &mut layers.responsive)),
		}
	}
	sheet.nodes = out;
	Ok(layers)
}

fn mark(nodes: &mut [Node], origin: Origin) {
	for node in nodes {
		match node {
			Node::Rule(rule) => rule.origin = origin,
			Node::AtRule(at) => {
				at.origin = origin;
				if let Some(children) = at.nodes.as_mut() {
					mark(children, origin);
				}
			}
			Node::Decl(_) | Node::Comment(_) => {}
		}
	}
}

impl Wrappers<'_> {
	fn expand(&mut self, node: Node, origin: Origin, responsive: &mut Vec<GeneratedRule>) -> Vec<Node> {
		let at = match node {
			Node::AtRule(at) if at.name == "responsive" || at.name == "variants" => at,
			other => return vec![other],
		};
		let children = at.nodes.unwrap_or_default();
		let Some(registry) = self.registry else {
			return children;
		};

		let names: Vec<&str> = if at.name == "responsive" {
			vec!["responsive"]
		} else {
			at.params.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
		};
		let mut combos: Vec<Vec<&Variant>> = vec![Vec::new()];
		combos.extend(
			names.iter()
				.filter_map(|name| registry.get(name))
				.filter(|variant| !variant.is_screen())
				.map(|variant| vec![variant]),
		);
		let screens: Vec<&Variant> = if names.contains(&"responsive") {
			registry.screens().collect()
		} else {
			Vec::new()
		};

		let mut in_place = Vec::new();
		for rule in children.iter().filter_map(Node::as_rule) {
			for combo in &combos[1..] {
				in_place.push(self.copy(rule, combo, origin));
			}
			for screen in &screens {
				for combo in &combos {
					let mut variants = vec![*screen];
					variants.extend(combo.iter().copied());
					responsive.push(self.copy(rule, &variants, origin));
				}
			}
		}
		let mut out = children;
		out.extend(into_nodes(sort_and_dedup(in_place)));
		out
	}

	/// Variant copy of an authored rule: every class is renamed with the
	/// variant prefix, then the variants transform the selector.
	fn copy(&mut self, rule: &Rule, variants: &[&Variant], origin: Origin) -> GeneratedRule {
		let mut class_prefix = String::new();
		for variant in variants {
			class_prefix.push_str(&variant.name);
			class_prefix.push_str(self.separator);
		}
		let classes = selector_classes(&rule.selector);
		let mut selector = rule.selector.clone();
		for class in &classes {
			let renamed = format!("{class_prefix}{class}");
			selector = replace_class(&selector, &escape_class(class), &escape_class(&renamed));
		}

		let mut target = VariantTarget::default();
		for variant in variants.iter().rev() {
			variant.apply(&mut target, self.prefix);
		}
		let selector = selector
			.split(',')
			.map(|part| format!("{}{}{}", target.ancestor, part.trim(), target.suffix))
			.collect::<Vec<_>>()
			.join(", ");

		self.sequence += 1;
		GeneratedRule {
			class: classes.first().map(|c| format!("{class_prefix}{c}")).unwrap_or_default(),
			selector,
			responsive: target.screen.is_some(),
			sort: SortKey {
				outer: target.screen.into_iter().collect(),
				plugin: usize::MAX,
				inner: target.sorted_ranks(false),
				value: self.sequence,
			},
			media: target.media,
			declarations: rule.declarations().cloned().collect(),
			origin,
		}
	}
}

/// Replaces `.old` class selectors with `.new`, leaving longer class names
/// that merely start with `old` alone.
fn replace_class(selector: &str, old: &str, new: &str) -> String {
	let needle = format!(".{old}");
	let mut out = String::with_capacity(selector.len() + new.len());
	let mut rest = selector;
	while let Some(pos) = rest.find(&needle) {
		let end = pos + needle.len();
		let boundary = rest[end..]
			.chars()
			.next()
			.is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '\\' || !c.is_ascii()));
		out.push_str(&rest[..pos]);
		if boundary {
			out.push('.');
			out.push_str(new);
		} else {
			out.push_str(&needle);
		}
		rest = &rest[end..];
	}
	out.push_str(rest);
	out
}

/// Generated and authored content of each layer.
#[derive(Debug, Default)]
pub struct LayerContent {
	pub base: Vec<Node>,
	pub components: Vec<Node>,
	pub utilities: Vec<Node>,
	pub responsive: Vec<Node>,
}

/// Replaces `@tailwind` directives with their layer content. Without any
/// directive the utilities are appended, as if `@tailwind utilities;`
/// ended the stylesheet. Responsive content goes to `@tailwind screens` /
/// `@tailwind variants` when present, otherwise after the utilities.
pub fn assemble(sheet: &mut Stylesheet, directives: &Directives, content: LayerContent) {
	let LayerContent {
		base,
		components,
		mut utilities,
		responsive,
	} = content;
	let mut responsive = Some(responsive);
	if !directives.responsive {
		utilities.extend(responsive.take().unwrap_or_default());
	}
	if !directives.any() {
		sheet.nodes.extend(utilities);
		return;
	}

	let mut base = Some(base);
	let mut components = Some(components);
	let mut utilities = Some(utilities);
	let mut out = Vec::with_capacity(sheet.nodes.len());
	for node in std::mem::take(&mut sheet.nodes) {
		let slot = match node.as_at_rule() {
			Some(at) if at.name == "tailwind" => at.params.trim().to_string(),
			_ => {
				out.push(node);
				continue;
			}
		};
		let replacement = match slot.as_str() {
			"base" => base.take(),
			"components" => components.take(),
			"utilities" => utilities.take(),
			_ => responsive.take(),
		};
		out.extend(replacement.unwrap_or_default());
	}
	sheet.nodes = out;
}

#[cfg(test)]
mod tests;
