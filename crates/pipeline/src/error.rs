//! Mapping engine failures onto the wire error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use windtunnel_engine::EngineError;
use windtunnel_worker::TransportError;

/// `file:line:col: message`, the diagnostic text of stylesheet errors.
static DIAGNOSTIC: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^.*?:([0-9]+):([0-9]+): (.*?)$").expect("diagnostic pattern is valid"));

/// Error as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ResponseError {
	pub message: String,
	/// `"Config"` or `"CSS"`; absent for engine faults.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line: Option<u32>,
}

impl ResponseError {
	pub fn message(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			file: None,
			line: None,
		}
	}

	/// Reads the position out of stylesheet diagnostic text. Text that does
	/// not match becomes a message-only error.
	pub fn from_diagnostic(text: &str) -> Self {
		match DIAGNOSTIC.captures(text) {
			Some(caps) => Self {
				message: caps[3].to_string(),
				file: Some("CSS".into()),
				line: caps[1].parse().ok(),
			},
			None => Self::message(text),
		}
	}
}

impl From<&EngineError> for ResponseError {
	fn from(err: &EngineError) -> Self {
		match err {
			EngineError::Config(config) => Self {
				message: config.message.clone(),
				file: Some("Config".into()),
				line: config.line,
			},
			EngineError::CssSyntax(syntax) => Self::from_diagnostic(&syntax.to_string()),
			EngineError::Fault(fault) => Self::message(fault.to_string()),
		}
	}
}

impl From<TransportError> for ResponseError {
	fn from(err: TransportError) -> Self {
		Self::message(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use windtunnel_engine::{ConfigError, EngineFault};

	use super::*;

	#[test]
	fn diagnostic_text_yields_line() {
		let err = ResponseError::from_diagnostic("<css input>:3:7: Unknown word");
		assert_eq!(err.message, "Unknown word");
		assert_eq!(err.file.as_deref(), Some("CSS"));
		assert_eq!(err.line, Some(3));

		let plain = ResponseError::from_diagnostic("something odd");
		assert_eq!(plain, ResponseError::message("something odd"));
		assert_eq!(serde_json::to_value(&plain).unwrap(), serde_json::json!({ "message": "something odd" }));
	}

	#[test]
	fn config_and_fault_mapping() {
		let config = ResponseError::from(&EngineError::Config(ConfigError::new("bad").with_line(2)));
		assert_eq!((config.file.as_deref(), config.line), (Some("Config"), Some(2)));

		let fault = ResponseError::from(&EngineError::Fault(EngineFault::UnknownVersion("7".into())));
		assert_eq!(fault, ResponseError::message("unknown engine version `7`"));
	}
}
