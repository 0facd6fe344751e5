//! Variant registry.
//!
//! Variants are registered in a fixed per-generation order; the rank of a
//! variant is its position in that order and drives rule sorting. Screens
//! are registered last.

use indexmap::IndexMap;

use crate::{DarkMode, EngineVersion, ResolvedConfig};

/// How a variant transforms a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantKind {
	/// Appends a pseudo-class, e.g. `:hover`.
	PseudoClass(&'static str),
	/// Requires an ancestor `.group` in the given state.
	Group(&'static str),
	/// Requires an ancestor `.dark`.
	DarkClass,
	/// Wraps the rule in `@media (...)`.
	Media(String),
	/// Wraps the rule in `@media (min-width: ...)`.
	Screen(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
	pub name: String,
	pub kind: VariantKind,
	pub rank: usize,
}

impl Variant {
	pub fn is_screen(&self) -> bool {
		matches!(self.kind, VariantKind::Screen(_))
	}

	/// Applies this variant to `target`; variants closest to the utility
	/// must be applied first.
	pub fn apply(&self, target: &mut VariantTarget, prefix: &str) {
		match &self.kind {
			VariantKind::PseudoClass(pseudo) => target.suffix.push_str(pseudo),
			VariantKind::Group(pseudo) => target.ancestor.insert_str(0, &format!(".{prefix}group{pseudo} ")),
			VariantKind::DarkClass => target.ancestor.insert_str(0, ".dark "),
			VariantKind::Media(query) => target.media.insert(0, query.clone()),
			VariantKind::Screen(width) => {
				target.media.insert(0, format!("(min-width: {width})"));
				target.screen = Some(self.rank);
			}
		}
		target.ranks.push(self.rank);
	}
}

/// Selector pieces accumulated while applying variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantTarget {
	pub ancestor: String,
	pub suffix: String,
	/// `@media` params, outermost first.
	pub media: Vec<String>,
	pub screen: Option<usize>,
	pub ranks: Vec<usize>,
}

impl VariantTarget {
	/// Full selector for the escaped class name.
	pub fn selector(&self, escaped_class: &str) -> String {
		format!("{}.{escaped_class}{}", self.ancestor, self.suffix)
	}

	/// Applied ranks sorted descending, excluding screens when `screens` is
	/// false.
	pub fn sorted_ranks(&self, screens: bool) -> Vec<usize> {
		let mut ranks: Vec<usize> =
			self.ranks.iter().copied().filter(|rank| screens || Some(*rank) != self.screen).collect();
		ranks.sort_unstable_by(|a, b| b.cmp(a));
		ranks
	}
}

const PSEUDO: &[(&str, &str)] = &[
	("first", ":first-child"),
	("last", ":last-child"),
	("odd", ":nth-child(odd)"),
	("even", ":nth-child(even)"),
	("visited", ":visited"),
	("checked", ":checked"),
	("focus-within", ":focus-within"),
	("hover", ":hover"),
	("focus", ":focus"),
	("focus-visible", ":focus-visible"),
	("active", ":active"),
	("disabled", ":disabled"),
];

/// Variants known to one resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
	variants: IndexMap<String, Variant>,
}

impl VariantRegistry {
	pub fn new(config: &ResolvedConfig) -> Self {
		let mut registry = Self::default();
		let pseudo = |registry: &mut Self, names: &[&str]| {
			for name in names {
				if let Some((_, pseudo)) = PSEUDO.iter().find(|(n, _)| n == name) {
					registry.push(name, VariantKind::PseudoClass(*pseudo));
				}
			}
		};
		let groups = |registry: &mut Self| {
			registry.push("group-hover", VariantKind::Group(":hover"));
			registry.push("group-focus", VariantKind::Group(":focus"));
		};
		let motion = |registry: &mut Self| {
			registry.push("motion-safe", VariantKind::Media("(prefers-reduced-motion: no-preference)".into()));
			registry.push("motion-reduce", VariantKind::Media("(prefers-reduced-motion: reduce)".into()));
		};
		let dark = |registry: &mut Self| match config.dark_mode {
			DarkMode::Media => registry.push("dark", VariantKind::Media("(prefers-color-scheme: dark)".into())),
			DarkMode::Class => registry.push("dark", VariantKind::DarkClass),
			DarkMode::Disabled => {}
		};

		match config.version {
			EngineVersion::V1 => {
				pseudo(&mut registry, &["first", "last", "odd", "even", "visited", "checked"]);
				groups(&mut registry);
				pseudo(&mut registry, &["focus-within", "hover", "focus", "focus-visible", "active", "disabled"]);
			}
			EngineVersion::V2 => {
				dark(&mut registry);
				motion(&mut registry);
				pseudo(&mut registry, &["first", "last", "odd", "even", "visited", "checked"]);
				groups(&mut registry);
				pseudo(&mut registry, &["focus-within", "hover", "focus", "focus-visible", "active", "disabled"]);
			}
			EngineVersion::V3 => {
				let all: Vec<&str> = PSEUDO.iter().map(|(name, _)| *name).collect();
				pseudo(&mut registry, &all);
				groups(&mut registry);
				motion(&mut registry);
				dark(&mut registry);
			}
		}
		for (name, width) in config.theme.screens() {
			registry.push(&name, VariantKind::Screen(width));
		}
		registry
	}

	fn push(&mut self, name: &str, kind: VariantKind) {
		let rank = self.variants.len();
		self.variants.insert(
			name.to_string(),
			Variant {
				name: name.to_string(),
				kind,
				rank,
			},
		);
	}

	pub fn get(&self, name: &str) -> Option<&Variant> {
		self.variants.get(name)
	}

	/// Registered names in rank order.
	pub fn names(&self) -> Vec<String> {
		self.variants.keys().cloned().collect()
	}

	pub fn screens(&self) -> impl Iterator<Item = &Variant> {
		self.variants.values().filter(|v| v.is_screen())
	}
}
