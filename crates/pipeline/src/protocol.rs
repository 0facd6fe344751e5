//! Wire messages between the caller and the pipeline.

use serde::{Deserialize, Serialize};
use windtunnel_engine::ConfigSource;

use crate::ResponseError;

/// Caller to pipeline. Absent inputs keep their last-seen value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
	pub request_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub html: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub css: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub config: Option<ConfigSource>,
	/// `'1' | '2' | '3'`; absent keeps the last valid version.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tailwind_version: Option<String>,
	#[serde(default, rename = "skipIntelliSense", skip_serializing_if = "Option::is_none")]
	pub skip_intellisense: Option<bool>,
	/// Recompile the last-seen inputs, ignoring `html`, `css` and `config`.
	#[serde(default, rename = "_recompile")]
	pub recompile: bool,
}

impl CompileRequest {
	pub fn new(request_id: impl Into<String>) -> Self {
		Self {
			request_id: request_id.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_html(mut self, html: impl Into<String>) -> Self {
		self.html = Some(html.into());
		self
	}

	#[must_use]
	pub fn with_css(mut self, css: impl Into<String>) -> Self {
		self.css = Some(css.into());
		self
	}

	#[must_use]
	pub fn with_config(mut self, config: impl Into<ConfigSource>) -> Self {
		self.config = Some(config.into());
		self
	}

	#[must_use]
	pub fn with_version(mut self, tag: impl Into<String>) -> Self {
		self.tailwind_version = Some(tag.into());
		self
	}
}

/// Pipeline to caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
	pub request_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub css: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub html: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ResponseError>,
	pub jit: bool,
	pub canceled: bool,
	pub build_id: u64,
	/// Milliseconds spent compiling, on success.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub compile_time: Option<u64>,
}

impl CompileResponse {
	pub(crate) fn canceled(request_id: String, build_id: u64) -> Self {
		Self {
			request_id,
			canceled: true,
			build_id,
			..Self::default()
		}
	}

	pub(crate) fn failed(request_id: String, build_id: u64, error: ResponseError) -> Self {
		Self {
			request_id,
			error: Some(error),
			build_id,
			..Self::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn request_reads_the_wire_names() {
		let request: CompileRequest = serde_json::from_value(json!({
			"requestId": "a",
			"html": "<p></p>",
			"config": "{ \"separator\": \"_\" }",
			"tailwindVersion": "3",
			"skipIntelliSense": true,
			"_recompile": true,
		}))
		.unwrap();
		assert_eq!(request.request_id, "a");
		assert_eq!(request.config, Some(ConfigSource::Text("{ \"separator\": \"_\" }".into())));
		assert_eq!(request.tailwind_version.as_deref(), Some("3"));
		assert_eq!(request.skip_intellisense, Some(true));
		assert!(request.recompile);
		assert_eq!(request.css, None);
	}

	#[test]
	fn response_omits_absent_fields() {
		let response = CompileResponse::canceled("b".into(), 4);
		assert_eq!(
			serde_json::to_value(&response).unwrap(),
			json!({ "requestId": "b", "jit": false, "canceled": true, "buildId": 4 })
		);
	}
}
