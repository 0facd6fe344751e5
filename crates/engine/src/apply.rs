//! `@apply` expansion.
//!
//! Inside a rule, `@apply a b !important;` is replaced by the declarations
//! of the named classes. Matches that carry pseudo-classes, ancestors or
//! media become sibling rules placed right after the applying rule, with
//! the class selector replaced by the applying rule's selector.

use rustc_hash::FxHashMap;
use windtunnel_css::{AtRule, CssSyntaxError, Declaration, Node, Position, Rule, Stylesheet, escape_class, selector_classes};

use crate::jit::JitContext;
use crate::{EngineError, EngineFault, Result};

/// One rule a class can be applied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRule {
	pub selector: String,
	/// Enclosing at-rule headers, outermost first.
	pub context: Vec<String>,
	pub declarations: Vec<Declaration>,
}

/// Expands `@apply` in a stylesheet.
pub trait ApplyExpander: Send + Sync {
	/// `context` is present on the JIT path.
	fn expand(&self, sheet: &mut Stylesheet, context: Option<&dyn JitContext>) -> Result<()>;
}

/// Looks classes up in the stylesheet itself, which on the classic path
/// holds the complete utility layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicApply;

impl ApplyExpander for ClassicApply {
	fn expand(&self, sheet: &mut Stylesheet, _context: Option<&dyn JitContext>) -> Result<()> {
		let index = index_rules(sheet);
		expand_nodes(&mut sheet.nodes, &|class| index.get(class).cloned())
	}
}

/// Looks classes up in the JIT context first, then in rules of the
/// stylesheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct JitApply;

impl ApplyExpander for JitApply {
	fn expand(&self, sheet: &mut Stylesheet, context: Option<&dyn JitContext>) -> Result<()> {
		let Some(context) = context else {
			return Err(EngineError::Fault(EngineFault::Internal("JIT apply requires a JIT context".into())));
		};
		let index = index_rules(sheet);
		expand_nodes(&mut sheet.nodes, &|class| {
			let generated = context.candidate_rules(class);
			if generated.is_empty() {
				return index.get(class).cloned();
			}
			Some(
				generated
					.into_iter()
					.map(|rule| AppliedRule {
						selector: rule.selector,
						context: rule.media.iter().map(|m| format!("@media {m}")).collect(),
						declarations: rule.declarations,
					})
					.collect(),
			)
		})
	}
}

/// Rules keyed by the last class in their selector.
fn index_rules(sheet: &Stylesheet) -> FxHashMap<String, Vec<AppliedRule>> {
	let mut index: FxHashMap<String, Vec<AppliedRule>> = FxHashMap::default();
	for contextual in sheet.contextual_rules() {
		let Some(class) = selector_classes(&contextual.rule.selector).pop() else {
			continue;
		};
		let declarations: Vec<Declaration> = contextual.rule.declarations().cloned().collect();
		if declarations.is_empty() {
			continue;
		}
		index.entry(class).or_default().push(AppliedRule {
			selector: contextual.rule.selector.clone(),
			context: contextual.context(),
			declarations,
		});
	}
	index
}

type Lookup<'a> = dyn Fn(&str) -> Option<Vec<AppliedRule>> + 'a;

fn expand_nodes(nodes: &mut Vec<Node>, lookup: &Lookup<'_>) -> Result<()> {
	let mut idx = 0;
	while idx < nodes.len() {
		let siblings = match &mut nodes[idx] {
			Node::Rule(rule) => expand_rule(rule, lookup)?,
			Node::AtRule(at) => {
				if let Some(children) = at.nodes.as_mut() {
					expand_nodes(children, lookup)?;
				}
				Vec::new()
			}
			Node::Decl(_) | Node::Comment(_) => Vec::new(),
		};
		let added = siblings.len();
		for (offset, node) in siblings.into_iter().enumerate() {
			nodes.insert(idx + 1 + offset, node);
		}
		idx += 1 + added;
	}
	Ok(())
}

fn expand_rule(rule: &mut Rule, lookup: &Lookup<'_>) -> Result<Vec<Node>> {
	let mut siblings = Vec::new();
	let mut body = Vec::with_capacity(rule.nodes.len());
	for node in std::mem::take(&mut rule.nodes) {
		let Node::AtRule(at) = node else {
			body.push(node);
			continue;
		};
		if at.name != "apply" {
			body.push(Node::AtRule(at));
			continue;
		}
		let (classes, important) = parse_params(&at.params);
		for class in classes {
			let matches = lookup(class).ok_or_else(|| missing_class(class, at.source))?;
			for applied in matches {
				let declarations = applied
					.declarations
					.iter()
					.map(|d| d.clone().with_important(d.important || important));
				let escaped = format!(".{}", escape_class(class));
				if applied.context.is_empty() && applied.selector == escaped {
					body.extend(declarations.map(Node::Decl));
					continue;
				}
				let selector = rule
					.selector
					.split(',')
					.map(|part| applied.selector.replace(&escaped, part.trim()))
					.collect::<Vec<_>>()
					.join(", ");
				let mut node = Node::Rule(Rule::new(selector).with_declarations(declarations).with_origin(rule.origin));
				for header in applied.context.iter().rev() {
					let (name, params) = split_header(header);
					node = Node::AtRule(AtRule::block(name, params).with_nodes(vec![node]).with_origin(rule.origin));
				}
				siblings.push(node);
			}
		}
	}
	rule.nodes = body;
	Ok(siblings)
}

fn parse_params(params: &str) -> (Vec<&str>, bool) {
	let mut important = false;
	let classes = params
		.split_whitespace()
		.filter(|token| {
			if *token == "!important" {
				important = true;
				false
			} else {
				true
			}
		})
		.collect();
	(classes, important)
}

fn split_header(header: &str) -> (&str, &str) {
	let header = header.trim_start_matches('@');
	header.split_once(' ').unwrap_or((header, ""))
}

fn missing_class(class: &str, position: Option<Position>) -> EngineError {
	CssSyntaxError::at(
		format!(
			"The `{class}` class does not exist. If `{class}` is a custom class, make sure it is defined within a `@layer` directive."
		),
		position,
	)
	.into()
}

#[cfg(test)]
mod tests;
