//! Just-in-time generation.
//!
//! A [`ContextBuilder`] turns a resolved configuration into a
//! [`JitContext`], which answers per-candidate questions. A
//! [`RuleGenerator`] scans content for candidates and asks the context for
//! their rules.

use std::sync::Arc;

use windtunnel_css::Declaration;

use crate::candidate;
use crate::generate::{GeneratedRule, SortStrategy, sort_and_dedup};
use crate::utilities::UtilitySet;
use crate::variants::VariantRegistry;
use crate::{ResolvedConfig, Result};

/// Evaluation context for one resolved configuration.
pub trait JitContext: Send + Sync {
	fn config(&self) -> &ResolvedConfig;

	/// Rules for one candidate such as `md:hover:text-red-500`; empty when
	/// the candidate is not a utility.
	fn candidate_rules(&self, candidate: &str) -> Vec<GeneratedRule>;

	/// Every utility class name, when the context supports enumeration.
	fn class_list(&self) -> Option<Vec<String>>;

	/// Registered variant names, in rank order.
	fn variant_names(&self) -> Vec<String>;

	/// Declarations of a base utility class.
	fn declarations_for(&self, class: &str) -> Option<Vec<Declaration>>;
}

/// Builds a [`JitContext`] for a resolved configuration.
pub trait ContextBuilder: Send + Sync {
	fn build(&self, config: Arc<ResolvedConfig>) -> Result<Arc<dyn JitContext>>;
}

/// Produces the rules for every candidate found in content.
pub trait RuleGenerator: Send + Sync {
	fn generate(&self, context: &dyn JitContext, contents: &[&str]) -> Vec<GeneratedRule>;
}

/// Context backed by [`UtilitySet`] and [`VariantRegistry`].
pub struct StandardContext {
	config: Arc<ResolvedConfig>,
	utilities: UtilitySet,
	variants: VariantRegistry,
	enumerable: bool,
}

impl StandardContext {
	pub fn new(config: Arc<ResolvedConfig>, enumerable: bool) -> Self {
		Self {
			utilities: UtilitySet::new(&config),
			variants: VariantRegistry::new(&config),
			config,
			enumerable,
		}
	}
}

impl JitContext for StandardContext {
	fn config(&self) -> &ResolvedConfig {
		&self.config
	}

	fn candidate_rules(&self, raw: &str) -> Vec<GeneratedRule> {
		let Some(parsed) = candidate::parse(raw, &self.config.separator) else {
			return Vec::new();
		};
		let mut variants = Vec::with_capacity(parsed.variants.len());
		for name in &parsed.variants {
			match self.variants.get(name) {
				Some(variant) => variants.push(variant),
				None => return Vec::new(),
			}
		}
		let arbitrary;
		let utility = match self.utilities.get(parsed.base) {
			Some(utility) => utility,
			None => {
				let Some(found) = self.utilities.arbitrary(parsed.base) else {
					return Vec::new();
				};
				arbitrary = found;
				&arbitrary
			}
		};
		vec![GeneratedRule::from_utility(
			raw,
			utility,
			&variants,
			parsed.important,
			&self.config.prefix,
			SortStrategy::Jit,
		)]
	}

	fn class_list(&self) -> Option<Vec<String>> {
		self.enumerable.then(|| self.utilities.class_names())
	}

	fn variant_names(&self) -> Vec<String> {
		self.variants.names()
	}

	fn declarations_for(&self, class: &str) -> Option<Vec<Declaration>> {
		self.utilities
			.get(class)
			.map(|u| u.declarations.clone())
			.or_else(|| self.utilities.arbitrary(class).map(|u| u.declarations))
	}
}

/// Builds [`StandardContext`]s; `enumerable` controls whether the contexts
/// expose a class list.
#[derive(Debug, Clone, Copy)]
pub struct StandardContextBuilder {
	pub enumerable: bool,
}

impl ContextBuilder for StandardContextBuilder {
	fn build(&self, config: Arc<ResolvedConfig>) -> Result<Arc<dyn JitContext>> {
		let started = std::time::Instant::now();
		let context = StandardContext::new(config, self.enumerable);
		tracing::debug!(
			utilities = context.utilities.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"jit context built"
		);
		Ok(Arc::new(context))
	}
}

/// Scans content with the candidate extractor and deduplicates the rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateRuleGenerator;

impl RuleGenerator for CandidateRuleGenerator {
	fn generate(&self, context: &dyn JitContext, contents: &[&str]) -> Vec<GeneratedRule> {
		let mut rules = Vec::new();
		for content in contents {
			for raw in candidate::extract(content) {
				rules.extend(context.candidate_rules(&raw));
			}
		}
		sort_and_dedup(rules)
	}
}
