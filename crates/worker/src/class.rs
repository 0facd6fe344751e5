//! Task classes and the spawn entry points that tag work with them.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::Instrument;

/// Execution classes used for worker scheduling and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Latency-sensitive work on the caller side (debounce, reconciliation).
	Interactive,
	/// Relay work: queue draining and state commitment.
	Relay,
	/// CPU-heavy compilation executed on the blocking pool.
	CpuBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Relay => "relay",
			Self::CpuBlocking => "cpu_blocking",
		}
	}

	fn span(self) -> tracing::Span {
		tracing::debug_span!("worker_task", class = self.as_str())
	}
}

/// Spawns `fut` on the current runtime. Events it emits carry its class.
///
/// # Panics
///
/// Panics when called outside a tokio runtime, like [`tokio::spawn`].
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	tokio::spawn(fut.instrument(class.span()))
}

/// Runs `f` on the blocking pool of the current runtime, inside its class span.
pub fn spawn_blocking<F, R>(class: TaskClass, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn_blocking");
	let span = class.span();
	tokio::task::spawn_blocking(move || span.in_scope(f))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn spawned_work_returns_its_output() {
		assert_eq!(spawn(TaskClass::Interactive, async { 2 + 2 }).await.unwrap(), 4);
		assert_eq!(spawn_blocking(TaskClass::CpuBlocking, || "done").await.unwrap(), "done");
	}

	#[test]
	fn class_names_are_stable() {
		assert_eq!(TaskClass::Relay.as_str(), "relay");
		assert_eq!(TaskClass::CpuBlocking.as_str(), "cpu_blocking");
	}
}
