//! Stylesheet printer.
//!
//! Top-level nodes are separated by a blank line. Block bodies are indented
//! by two spaces per level; declarations sit one per line and nested blocks
//! are separated by a blank line.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::{AtRule, Declaration, Node, Rule, Stylesheet};

const INDENT: &str = "  ";

impl Display for Stylesheet {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		for (idx, node) in self.nodes.iter().enumerate() {
			if idx > 0 {
				f.write_str("\n\n")?;
			}
			write_node(f, node, 0)?;
		}
		Ok(())
	}
}

impl Display for Node {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write_node(f, self, 0)
	}
}

impl Display for Declaration {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.prop, self.value)?;
		if self.important {
			f.write_str(" !important")?;
		}
		f.write_char(';')
	}
}

fn indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
	for _ in 0..depth {
		f.write_str(INDENT)?;
	}
	Ok(())
}

fn write_node(f: &mut Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
	indent(f, depth)?;
	match node {
		Node::Rule(rule) => write_rule(f, rule, depth),
		Node::AtRule(at) => write_at_rule(f, at, depth),
		Node::Decl(decl) => write!(f, "{decl}"),
		Node::Comment(comment) => write!(f, "/* {} */", comment.text),
	}
}

fn write_rule(f: &mut Formatter<'_>, rule: &Rule, depth: usize) -> fmt::Result {
	write!(f, "{} {{", rule.selector)?;
	write_body(f, &rule.nodes, depth)
}

fn write_at_rule(f: &mut Formatter<'_>, at: &AtRule, depth: usize) -> fmt::Result {
	f.write_str(&at.header())?;
	match &at.nodes {
		Some(nodes) => {
			f.write_str(" {")?;
			write_body(f, nodes, depth)
		}
		None => f.write_char(';'),
	}
}

fn write_body(f: &mut Formatter<'_>, nodes: &[Node], depth: usize) -> fmt::Result {
	let mut previous: Option<&Node> = None;
	for node in nodes {
		let blank = previous.is_some_and(|prev| is_block(prev) || is_block(node));
		f.write_str(if blank { "\n\n" } else { "\n" })?;
		write_node(f, node, depth + 1)?;
		previous = Some(node);
	}
	f.write_char('\n')?;
	indent(f, depth)?;
	f.write_char('}')
}

fn is_block(node: &Node) -> bool {
	match node {
		Node::Rule(_) => true,
		Node::AtRule(at) => at.nodes.is_some(),
		Node::Decl(_) | Node::Comment(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use crate::{AtRule, Declaration, Node, Rule, Stylesheet, parse};

	#[test]
	fn prints_generated_rules() {
		let sheet = Stylesheet::new(vec![
			Node::Rule(Rule::new(".a").with_declarations([Declaration::new("color", "red")])),
			Node::AtRule(AtRule::block("media", "(min-width: 640px)").with_nodes(vec![
				Node::Rule(Rule::new(".sm\\:a").with_declarations([Declaration::new("margin", "0").with_important(true)])),
				Node::Rule(Rule::new(".sm\\:b").with_declarations([Declaration::new("margin", "1px")])),
			])),
		]);
		let expected = ".a {\n  color: red;\n}\n\n@media (min-width: 640px) {\n  .sm\\:a {\n    margin: 0 !important;\n  }\n\n  .sm\\:b {\n    margin: 1px;\n  }\n}";
		assert_eq!(sheet.to_string(), expected);
	}

	#[test]
	fn reparses_printed_output() {
		let source = "@import \"x.css\";\n\na {\n  color: red;\n  /* note */\n\n  b {\n    margin: 0;\n  }\n}\n\n@font-face {\n}";
		let sheet = parse(source).unwrap();
		assert_eq!(sheet.to_string(), source);
	}
}
