//! Pipeline options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables of the pipeline, deserializable with defaults for every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
	/// Quiet period before an edit is dispatched, in milliseconds. Zero
	/// dispatches immediately.
	pub debounce_ms: u64,
	/// Mailbox capacity of the compute unit.
	pub queue_capacity: usize,
	/// Engine version used until a request names one.
	pub default_version: String,
	/// Whether requests skip IntelliSense extraction unless they say
	/// otherwise.
	pub skip_intellisense: bool,
}

impl Default for PipelineOptions {
	fn default() -> Self {
		Self {
			debounce_ms: 200,
			queue_capacity: 64,
			default_version: "2".into(),
			skip_intellisense: false,
		}
	}
}

impl PipelineOptions {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}
