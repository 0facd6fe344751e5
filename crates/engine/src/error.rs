//! Engine error taxonomy.

use thiserror::Error;
use windtunnel_css::CssSyntaxError;

use crate::EngineVersion;

/// Malformed framework configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
	pub message: String,
	/// 1-based line in the configuration source, when known.
	pub line: Option<u32>,
}

impl ConfigError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			line: None,
		}
	}

	#[must_use]
	pub fn with_line(mut self, line: u32) -> Self {
		self.line = Some(line);
		self
	}
}

/// Failures that are neither configuration nor stylesheet problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFault {
	/// Version tag outside `'1' | '2' | '3'`.
	#[error("unknown engine version `{0}`")]
	UnknownVersion(String),
	/// The bundle for `version` does not carry a module the request needs.
	#[error("engine module `{module}` is not available in version {version}")]
	ModuleUnavailable {
		module: &'static str,
		version: EngineVersion,
	},
	/// Any other failure inside compilation.
	#[error("{0}")]
	Internal(String),
}

/// Everything a compile can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	CssSyntax(#[from] CssSyntaxError),
	#[error(transparent)]
	Fault(#[from] EngineFault),
}

pub type Result<T> = std::result::Result<T, EngineError>;
