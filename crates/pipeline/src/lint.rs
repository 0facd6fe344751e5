//! Lint severities exposed to editor integrations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
	Ignore,
	Warning,
	Error,
}

/// Diagnostics an editor integration can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LintRule {
	/// Two classes on one element set the same property.
	CssConflict,
	/// `@apply` of something that cannot be applied.
	InvalidApply,
	/// `@screen` with an unknown breakpoint.
	InvalidScreen,
	/// `@variants` with an unknown variant.
	InvalidVariant,
	/// `theme()` with a path missing from the theme.
	InvalidConfigPath,
	/// Unknown `@tailwind` parameter.
	InvalidTailwindDirective,
	/// Variants written in an order other than the recommended one.
	RecommendedVariantOrder,
}

/// Severity per lint rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSettings {
	pub css_conflict: LintSeverity,
	pub invalid_apply: LintSeverity,
	pub invalid_screen: LintSeverity,
	pub invalid_variant: LintSeverity,
	pub invalid_config_path: LintSeverity,
	pub invalid_tailwind_directive: LintSeverity,
	pub recommended_variant_order: LintSeverity,
}

impl Default for LintSettings {
	fn default() -> Self {
		Self {
			css_conflict: LintSeverity::Warning,
			invalid_apply: LintSeverity::Error,
			invalid_screen: LintSeverity::Error,
			invalid_variant: LintSeverity::Error,
			invalid_config_path: LintSeverity::Error,
			invalid_tailwind_directive: LintSeverity::Error,
			recommended_variant_order: LintSeverity::Warning,
		}
	}
}

impl LintSettings {
	pub fn severity(&self, rule: LintRule) -> LintSeverity {
		match rule {
			LintRule::CssConflict => self.css_conflict,
			LintRule::InvalidApply => self.invalid_apply,
			LintRule::InvalidScreen => self.invalid_screen,
			LintRule::InvalidVariant => self.invalid_variant,
			LintRule::InvalidConfigPath => self.invalid_config_path,
			LintRule::InvalidTailwindDirective => self.invalid_tailwind_directive,
			LintRule::RecommendedVariantOrder => self.recommended_variant_order,
		}
	}

	#[must_use]
	pub fn with(mut self, rule: LintRule, severity: LintSeverity) -> Self {
		let slot = match rule {
			LintRule::CssConflict => &mut self.css_conflict,
			LintRule::InvalidApply => &mut self.invalid_apply,
			LintRule::InvalidScreen => &mut self.invalid_screen,
			LintRule::InvalidVariant => &mut self.invalid_variant,
			LintRule::InvalidConfigPath => &mut self.invalid_config_path,
			LintRule::InvalidTailwindDirective => &mut self.invalid_tailwind_directive,
			LintRule::RecommendedVariantOrder => &mut self.recommended_variant_order,
		};
		*slot = severity;
		self
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn defaults_serialize_with_editor_names() {
		assert_eq!(
			serde_json::to_value(LintSettings::default()).unwrap(),
			json!({
				"cssConflict": "warning",
				"invalidApply": "error",
				"invalidScreen": "error",
				"invalidVariant": "error",
				"invalidConfigPath": "error",
				"invalidTailwindDirective": "error",
				"recommendedVariantOrder": "warning",
			})
		);
	}

	#[test]
	fn rules_are_independently_settable() {
		let settings = LintSettings::default().with(LintRule::CssConflict, LintSeverity::Ignore);
		assert_eq!(settings.severity(LintRule::CssConflict), LintSeverity::Ignore);
		assert_eq!(settings.severity(LintRule::InvalidApply), LintSeverity::Error);
	}
}
