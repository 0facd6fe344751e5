//! Vendor prefixes for the few properties generated utilities need them
//! for.

use windtunnel_css::{Declaration, Node, Stylesheet};

/// Adds vendor-prefixed declarations to a compiled stylesheet.
pub trait Autoprefixer: Send + Sync {
	fn process(&self, sheet: &mut Stylesheet);
}

const PREFIXES: &[(&str, &[&str])] = &[
	("appearance", &["-webkit-", "-moz-"]),
	("user-select", &["-webkit-", "-moz-", "-ms-"]),
	("backdrop-filter", &["-webkit-"]),
];

/// Inserts prefixed copies right before the unprefixed declaration,
/// skipping prefixes already written.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPrefixer;

impl Autoprefixer for StandardPrefixer {
	fn process(&self, sheet: &mut Stylesheet) {
		prefix_nodes(&mut sheet.nodes);
	}
}

fn prefix_nodes(nodes: &mut Vec<Node>) {
	let mut out = Vec::with_capacity(nodes.len());
	for mut node in std::mem::take(nodes) {
		match &mut node {
			Node::Rule(rule) => prefix_nodes(&mut rule.nodes),
			Node::AtRule(at) => {
				if let Some(children) = at.nodes.as_mut() {
					prefix_nodes(children);
				}
			}
			Node::Decl(decl) => {
				if let Some((_, prefixes)) = PREFIXES.iter().find(|(prop, _)| *prop == decl.prop) {
					for prefix in prefixes.iter() {
						let prop = format!("{prefix}{}", decl.prop);
						let present = out.iter().filter_map(Node::as_decl).any(|d: &Declaration| d.prop == prop);
						if !present {
							out.push(Node::Decl(Declaration::new(prop, decl.value.clone()).with_important(decl.important)));
						}
					}
				}
			}
			Node::Comment(_) => {}
		}
		out.push(node);
	}
	*nodes = out;
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use windtunnel_css::parse;

	use super::*;

	#[test]
	fn prefixes_known_properties() {
		let mut sheet = parse(".a { -webkit-appearance: none; appearance: none; color: red }\n@media print { .b { user-select: none } }").unwrap();
		StandardPrefixer.process(&mut sheet);
		assert_eq!(
			sheet.to_string(),
			".a {\n  -webkit-appearance: none;\n  -moz-appearance: none;\n  appearance: none;\n  color: red;\n}\n\n@media print {\n  .b {\n    -webkit-user-select: none;\n    -moz-user-select: none;\n    -ms-user-select: none;\n    user-select: none;\n  }\n}"
		);
	}
}
