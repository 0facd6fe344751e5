//! Compute tier.
//!
//! The [`CompileOrchestrator`] runs inside the compute unit of a
//! [`WorkerQueue`](windtunnel_worker::WorkerQueue). For each request it
//! resolves the engine bundle and the configuration, sequences the build,
//! and runs the compile on the blocking pool. It never touches the
//! IntelliSense state; a response is marked canceled when a newer request
//! was submitted while it ran.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use windtunnel_engine::jit::JitContext;
use windtunnel_engine::{
	CompileInput, ConfigResolver, ConfigSource, EngineError, EngineFault, ResolvedConfig, StateSeed, VersionRegistry, compile,
};
use windtunnel_worker::{QueueHandler, TaskClass, Ticket, spawn_blocking};

/// Request as the compute unit sees it: inputs already reconciled with the
/// last-seen ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeRequest {
	pub request_id: String,
	pub html: String,
	pub css: String,
	pub config: ConfigSource,
	/// Unvalidated version tag.
	pub version_tag: String,
	pub skip_intellisense: bool,
}

/// Successful compile, plus what the relay needs to commit state.
pub struct Compiled {
	pub css: String,
	pub html: Option<String>,
	pub jit: bool,
	pub compile_time_ms: u64,
	pub seed: Option<StateSeed>,
	pub config: Arc<ResolvedConfig>,
	pub context: Option<Arc<dyn JitContext>>,
}

impl std::fmt::Debug for Compiled {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Compiled")
			.field("jit", &self.jit)
			.field("compile_time_ms", &self.compile_time_ms)
			.field("css", &self.css)
			.finish_non_exhaustive()
	}
}

#[derive(Debug)]
pub enum ComputeOutcome {
	Compiled(Box<Compiled>),
	Failed(EngineError),
	/// A newer request was submitted before this one finished.
	Canceled,
}

#[derive(Debug)]
pub struct ComputeResponse {
	pub request_id: String,
	/// Build active when the response was produced.
	pub build_id: u64,
	pub outcome: ComputeOutcome,
}

/// Process-lifetime build counter.
///
/// A build is one (markup, stylesheet) pair. The counter moves only when a
/// request whose configuration resolved carries content different from the
/// last sequenced build, so configuration-only and flag-only changes share
/// a build.
#[derive(Debug, Default)]
pub struct BuildSequencer {
	build_id: u64,
	last: Option<(String, String)>,
}

impl BuildSequencer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn current(&self) -> u64 {
		self.build_id
	}

	/// Sequences a build for `html` and `css`; returns the build id and
	/// whether this was a fresh build.
	pub fn observe(&mut self, html: &str, css: &str) -> (u64, bool) {
		let fresh = self.last.as_ref().is_none_or(|(h, c)| h != html || c != css);
		if fresh {
			self.build_id += 1;
			self.last = Some((html.to_string(), css.to_string()));
		}
		(self.build_id, fresh)
	}
}

/// Queue handler of the compute unit.
pub struct CompileOrchestrator {
	registry: Arc<VersionRegistry>,
	resolver: Arc<dyn ConfigResolver>,
	builds: Arc<Mutex<BuildSequencer>>,
}

impl CompileOrchestrator {
	/// `builds` outlives the orchestrator so a restarted compute unit keeps
	/// counting from where the previous one stopped.
	pub fn new(registry: Arc<VersionRegistry>, resolver: Arc<dyn ConfigResolver>, builds: Arc<Mutex<BuildSequencer>>) -> Self {
		Self { registry, resolver, builds }
	}

	async fn run(&self, request: &ComputeRequest) -> Result<Compiled, EngineError> {
		let bundle = self.registry.resolve_tag(&request.version_tag)?;
		let user = self.resolver.resolve(&request.config, bundle.version).await?;
		let config = bundle.config_merger.merge(&user)?;

		let (build_id, fresh) = self.builds.lock().observe(&request.html, &request.css);
		tracing::debug!(build_id, request_id = %request.request_id, fresh, "build sequenced");

		let input = CompileInput {
			markup: request.html.clone(),
			stylesheet: request.css.clone(),
			skip_intellisense: request.skip_intellisense,
		};
		let started = Instant::now();
		let output = spawn_blocking(TaskClass::CpuBlocking, move || compile(&bundle, &config, &input))
			.await
			.map_err(|err| EngineFault::Internal(format!("compile task failed: {err}")))??;
		let compile_time_ms = started.elapsed().as_millis() as u64;

		Ok(Compiled {
			css: output.css,
			html: output.html,
			jit: output.jit,
			compile_time_ms,
			seed: output.state,
			config: output.config,
			context: output.context,
		})
	}
}

#[async_trait]
impl QueueHandler for CompileOrchestrator {
	type Request = ComputeRequest;
	type Response = ComputeResponse;

	async fn handle(&mut self, request: ComputeRequest, ticket: &Ticket) -> ComputeResponse {
		let result = self.run(&request).await;
		let build_id = self.builds.lock().current();
		let outcome = if ticket.is_superseded() {
			tracing::warn!(request_id = %request.request_id, build_id, "compile superseded, canceled");
			ComputeOutcome::Canceled
		} else {
			match result {
				Ok(compiled) => {
					tracing::debug!(
						request_id = %request.request_id,
						build_id,
						jit = compiled.jit,
						elapsed_ms = compiled.compile_time_ms,
						"compile time"
					);
					ComputeOutcome::Compiled(Box::new(compiled))
				}
				Err(err) => ComputeOutcome::Failed(err),
			}
		};
		ComputeResponse {
			request_id: request.request_id,
			build_id,
			outcome,
		}
	}
}
