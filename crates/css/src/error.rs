//! Error type for stylesheet parsing.

use thiserror::Error;

/// Source name used in diagnostics for in-memory stylesheets.
pub const INPUT_NAME: &str = "<css input>";

/// Malformed stylesheet input.
///
/// Displays as `<css input>:LINE:COL: REASON`, the diagnostic text format
/// consumers parse to recover the position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name}:{line}:{column}: {reason}")]
pub struct CssSyntaxError {
	/// Human readable reason, e.g. `Unclosed block`.
	pub reason: String,
	/// 1-based line.
	pub line: u32,
	/// 1-based column.
	pub column: u32,
	/// Name of the stylesheet source.
	pub source_name: String,
}

impl CssSyntaxError {
	/// Creates an error for the in-memory stylesheet.
	pub fn new(reason: impl Into<String>, line: u32, column: u32) -> Self {
		Self {
			reason: reason.into(),
			line,
			column,
			source_name: INPUT_NAME.to_string(),
		}
	}

	/// Creates an error located at `position`, or at 1:1 when unknown.
	pub fn at(reason: impl Into<String>, position: Option<crate::Position>) -> Self {
		let position = position.unwrap_or_default();
		Self::new(reason, position.line.max(1), position.column.max(1))
	}
}

/// Result type for stylesheet operations.
pub type Result<T> = std::result::Result<T, CssSyntaxError>;
