/// 1-based source position of a parsed node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
	pub line: u32,
	pub column: u32,
}

impl Position {
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}
}

/// Output layer of generated nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
	Base,
	Components,
	Utilities,
}

/// Where a rule came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Origin {
	/// Written by the user in the stylesheet.
	#[default]
	Authored,
	/// Produced by the engine into a layer.
	Generated(Layer),
}

impl Origin {
	pub fn layer(self) -> Option<Layer> {
		match self {
			Self::Authored => None,
			Self::Generated(layer) => Some(layer),
		}
	}
}

/// `prop: value` pair, optionally `!important`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
	pub prop: String,
	pub value: String,
	pub important: bool,
	pub source: Option<Position>,
}

impl Declaration {
	pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			prop: prop.into(),
			value: value.into(),
			important: false,
			source: None,
		}
	}

	#[must_use]
	pub fn with_important(mut self, important: bool) -> Self {
		self.important = important;
		self
	}
}

/// Style rule: selector plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
	pub selector: String,
	pub nodes: Vec<Node>,
	pub source: Option<Position>,
	pub origin: Origin,
}

impl Rule {
	pub fn new(selector: impl Into<String>) -> Self {
		Self {
			selector: selector.into(),
			nodes: Vec::new(),
			source: None,
			origin: Origin::Authored,
		}
	}

	#[must_use]
	pub fn with_declarations(mut self, declarations: impl IntoIterator<Item = Declaration>) -> Self {
		self.nodes.extend(declarations.into_iter().map(Node::Decl));
		self
	}

	#[must_use]
	pub fn with_origin(mut self, origin: Origin) -> Self {
		self.origin = origin;
		self
	}

	/// Declarations directly inside this rule.
	pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
		self.nodes.iter().filter_map(Node::as_decl)
	}
}

/// `@name params;` or `@name params { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
	pub name: String,
	pub params: String,
	pub nodes: Option<Vec<Node>>,
	pub source: Option<Position>,
	pub origin: Origin,
}

impl AtRule {
	/// Creates an at-rule with an empty block.
	pub fn block(name: impl Into<String>, params: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			params: params.into(),
			nodes: Some(Vec::new()),
			source: None,
			origin: Origin::Authored,
		}
	}

	#[must_use]
	pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
		self.nodes = Some(nodes);
		self
	}

	#[must_use]
	pub fn with_origin(mut self, origin: Origin) -> Self {
		self.origin = origin;
		self
	}

	/// Header text as written, e.g. `@media (min-width: 640px)`.
	pub fn header(&self) -> String {
		if self.params.is_empty() {
			format!("@{}", self.name)
		} else {
			format!("@{} {}", self.name, self.params)
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
	pub text: String,
	pub source: Option<Position>,
}

impl Comment {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			source: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Rule(Rule),
	AtRule(AtRule),
	Decl(Declaration),
	Comment(Comment),
}

impl Node {
	pub fn as_rule(&self) -> Option<&Rule> {
		match self {
			Self::Rule(rule) => Some(rule),
			_ => None,
		}
	}

	pub fn as_at_rule(&self) -> Option<&AtRule> {
		match self {
			Self::AtRule(at) => Some(at),
			_ => None,
		}
	}

	pub fn as_decl(&self) -> Option<&Declaration> {
		match self {
			Self::Decl(decl) => Some(decl),
			_ => None,
		}
	}

	pub fn source(&self) -> Option<Position> {
		match self {
			Self::Rule(rule) => rule.source,
			Self::AtRule(at) => at.source,
			Self::Decl(decl) => decl.source,
			Self::Comment(comment) => comment.source,
		}
	}
}

/// A rule together with the chain of enclosing at-rules, outermost first.
#[derive(Debug, Clone)]
pub struct ContextualRule<'a> {
	pub rule: &'a Rule,
	pub at_rules: Vec<&'a AtRule>,
}

impl ContextualRule<'_> {
	/// Headers of the enclosing at-rules, outermost first.
	pub fn context(&self) -> Vec<String> {
		self.at_rules.iter().map(|at| at.header()).collect()
	}
}

/// Root of a parsed or generated stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
	pub nodes: Vec<Node>,
}

impl Stylesheet {
	pub fn new(nodes: Vec<Node>) -> Self {
		Self { nodes }
	}

	/// Every rule in document order with its at-rule context.
	pub fn contextual_rules(&self) -> Vec<ContextualRule<'_>> {
		let mut out = Vec::new();
		let mut stack = Vec::new();
		collect_rules(&self.nodes, &mut stack, &mut out);
		out
	}

	/// Visits every rule, including rules nested in at-rules and other rules.
	pub fn walk_rules_mut(&mut self, f: &mut impl FnMut(&mut Rule)) {
		walk_rules_mut(&mut self.nodes, f);
	}

	/// Visits every declaration; stops at the first error.
	pub fn try_walk_decls_mut<E>(&mut self, f: &mut impl FnMut(&mut Declaration) -> Result<(), E>) -> Result<(), E> {
		try_walk_decls_mut(&mut self.nodes, f)
	}

	/// Removes rules rejected by `keep`. Block at-rules emptied by the
	/// removal are dropped too; at-rules that were already empty stay.
	pub fn retain_rules(&mut self, keep: &mut impl FnMut(&Rule) -> bool) {
		retain_rules(&mut self.nodes, keep);
	}

	/// Number of rules anywhere in the tree.
	pub fn rule_count(&self) -> usize {
		self.contextual_rules().len()
	}
}

fn collect_rules<'a>(nodes: &'a [Node], stack: &mut Vec<&'a AtRule>, out: &mut Vec<ContextualRule<'a>>) {
	for node in nodes {
		match node {
			Node::Rule(rule) => {
				out.push(ContextualRule {
					rule,
					at_rules: stack.clone(),
				});
				collect_rules(&rule.nodes, stack, out);
			}
			Node::AtRule(at) => {
				if let Some(children) = &at.nodes {
					stack.push(at);
					collect_rules(children, stack, out);
					stack.pop();
				}
			}
			Node::Decl(_) | Node::Comment(_) => {}
		}
	}
}

fn walk_rules_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut Rule)) {
	for node in nodes {
		match node {
			Node::Rule(rule) => {
				f(rule);
				walk_rules_mut(&mut rule.nodes, f);
			}
			Node::AtRule(at) => {
				if let Some(children) = at.nodes.as_mut() {
					walk_rules_mut(children, f);
				}
			}
			Node::Decl(_) | Node::Comment(_) => {}
		}
	}
}

fn try_walk_decls_mut<E>(nodes: &mut [Node], f: &mut impl FnMut(&mut Declaration) -> Result<(), E>) -> Result<(), E> {
	for node in nodes {
		match node {
			Node::Decl(decl) => f(decl)?,
			Node::Rule(rule) => try_walk_decls_mut(&mut rule.nodes, f)?,
			Node::AtRule(at) => {
				if let Some(children) = at.nodes.as_mut() {
					try_walk_decls_mut(children, f)?;
				}
			}
			Node::Comment(_) => {}
		}
	}
	Ok(())
}

fn retain_rules(nodes: &mut Vec<Node>, keep: &mut impl FnMut(&Rule) -> bool) {
	nodes.retain_mut(|node| match node {
		Node::Rule(rule) => keep(rule),
		Node::AtRule(at) => match at.nodes.as_mut() {
			Some(children) if !children.is_empty() => {
				retain_rules(children, keep);
				!children.is_empty()
			}
			_ => true,
		},
		Node::Decl(_) | Node::Comment(_) => true,
	});
}
