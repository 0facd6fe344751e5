//! Relay tier.
//!
//! The relay owns the last-seen inputs and the long-lived IntelliSense
//! state. Each request is reconciled with the last-seen inputs and
//! submitted to the compute unit synchronously, which makes it the current
//! request before any await. When the response comes back the relay checks
//! the request is still current, then commits.

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use windtunnel_engine::color::{ColorResolver, DeclarationColorResolver};
use windtunnel_engine::extract::build_state;
use windtunnel_engine::{ConfigResolver, ConfigSource, EngineVersion, IntelliSenseState, JsonConfigResolver, VersionRegistry};
use windtunnel_worker::{Lineage, TaskClass, Ticket, TransportError, WorkerQueue};

use crate::compute::{BuildSequencer, CompileOrchestrator, ComputeOutcome, ComputeRequest, ComputeResponse};
use crate::{CompileRequest, CompileResponse, LintSettings, PipelineOptions, ResponseError};

type ComputeQueue = WorkerQueue<ComputeRequest, ComputeResponse>;

#[derive(Debug, Default)]
struct LastSeen {
	html: String,
	css: String,
	config: ConfigSource,
	version: String,
}

#[derive(Debug, Default)]
struct Committed {
	intellisense: Option<IntelliSenseState>,
	build_id: u64,
}

pub struct Relay {
	options: PipelineOptions,
	registry: Arc<VersionRegistry>,
	resolver: Arc<dyn ConfigResolver>,
	colors: Arc<dyn ColorResolver>,
	builds: Arc<Mutex<BuildSequencer>>,
	/// Shared by every compute unit so a restart keeps supersession intact.
	lineage: Lineage,
	queue: ArcSwap<ComputeQueue>,
	seen: Mutex<LastSeen>,
	committed: tokio::sync::Mutex<Committed>,
	lint: LintSettings,
}

impl Relay {
	/// Relay with the JSON config resolver and declaration-based colors.
	pub fn new(options: PipelineOptions) -> Self {
		Self::with_resolvers(options, Arc::new(JsonConfigResolver), Arc::new(DeclarationColorResolver))
	}

	pub fn with_resolvers(options: PipelineOptions, resolver: Arc<dyn ConfigResolver>, colors: Arc<dyn ColorResolver>) -> Self {
		let registry = Arc::new(VersionRegistry::new());
		let builds = Arc::new(Mutex::new(BuildSequencer::new()));
		let lineage = Lineage::new();
		let queue = spawn_compute(&options, &registry, &resolver, &builds, &lineage);
		let seen = LastSeen {
			version: options.default_version.clone(),
			..LastSeen::default()
		};
		Self {
			options,
			registry,
			resolver,
			colors,
			builds,
			lineage,
			queue: ArcSwap::from_pointee(queue),
			seen: Mutex::new(seen),
			committed: tokio::sync::Mutex::new(Committed::default()),
			lint: LintSettings::default(),
		}
	}

	/// Submits `request` and resolves to its response.
	///
	/// The request is reconciled and submitted before this function
	/// returns, so it supersedes every earlier request even if the returned
	/// future is polled late.
	pub fn submit(&self, request: CompileRequest) -> impl Future<Output = Result<CompileResponse, TransportError>> + Send + '_ {
		let compute = self.reconcile(request);
		let skip = compute.skip_intellisense;
		let submission = self.queue.load().submit(compute);
		async move {
			let ticket = submission.ticket().clone();
			let response = match submission.await {
				Ok(response) => response,
				Err(err) => {
					tracing::warn!(error = %err, "compute unit unavailable");
					return Err(err);
				}
			};
			Ok(self.deliver(response, &ticket, skip).await)
		}
	}

	fn reconcile(&self, request: CompileRequest) -> ComputeRequest {
		let mut seen = self.seen.lock();
		if !request.recompile {
			if let Some(html) = request.html {
				seen.html = html;
			}
			if let Some(css) = request.css {
				seen.css = css;
			}
			if let Some(config) = request.config {
				seen.config = config;
			}
		}
		let version_tag = match request.tailwind_version {
			Some(tag) if EngineVersion::parse(&tag).is_ok() => {
				seen.version = tag.trim().to_string();
				seen.version.clone()
			}
			Some(invalid) => invalid,
			None => seen.version.clone(),
		};
		ComputeRequest {
			request_id: request.request_id,
			html: seen.html.clone(),
			css: seen.css.clone(),
			config: seen.config.clone(),
			version_tag,
			skip_intellisense: request.skip_intellisense.unwrap_or(self.options.skip_intellisense),
		}
	}

	async fn deliver(&self, response: ComputeResponse, ticket: &Ticket, skip: bool) -> CompileResponse {
		let ComputeResponse {
			request_id,
			build_id,
			outcome,
		} = response;
		let compiled = match outcome {
			ComputeOutcome::Canceled => return CompileResponse::canceled(request_id, build_id),
			ComputeOutcome::Failed(err) => {
				tracing::debug!(%request_id, error = %err, "compile failed");
				return CompileResponse::failed(request_id, build_id, ResponseError::from(&err));
			}
			ComputeOutcome::Compiled(compiled) => *compiled,
		};

		let state = match compiled.seed {
			Some(seed) if !skip => {
				Some(build_state(seed, &compiled.config, compiled.context.as_deref(), self.colors.as_ref()).await)
			}
			_ => None,
		};

		let mut committed = self.committed.lock().await;
		if ticket.is_superseded() {
			tracing::warn!(%request_id, build_id, "response superseded before commit, canceled");
			return CompileResponse::canceled(request_id, build_id);
		}
		committed.build_id = build_id;
		if let Some(state) = state {
			committed.intellisense = Some(state);
		}
		CompileResponse {
			request_id,
			css: Some(compiled.css),
			html: compiled.html,
			error: None,
			jit: compiled.jit,
			canceled: false,
			build_id,
			compile_time: Some(compiled.compile_time_ms),
		}
	}

	/// IntelliSense state of the last committed compile that produced one.
	pub async fn intellisense(&self) -> Option<IntelliSenseState> {
		self.committed.lock().await.intellisense.clone()
	}

	/// Build id of the last committed compile.
	pub async fn committed_build(&self) -> u64 {
		self.committed.lock().await.build_id
	}

	/// Latest build id sequenced by the compute tier.
	pub fn build_id(&self) -> u64 {
		self.builds.lock().current()
	}

	pub fn lint(&self) -> &LintSettings {
		&self.lint
	}

	pub fn is_compute_alive(&self) -> bool {
		!self.queue.load().is_closed()
	}

	/// Replaces the compute unit. Requests pending on the old unit,
	/// including one being compiled, fail with a transport error; build
	/// and request numbering continue.
	pub fn restart_compute(&self) {
		let queue = spawn_compute(&self.options, &self.registry, &self.resolver, &self.builds, &self.lineage);
		let old = self.queue.swap(Arc::new(queue));
		old.shutdown();
		tracing::warn!("compute unit restarted");
	}
}

impl std::fmt::Debug for Relay {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Relay")
			.field("options", &self.options)
			.field("registry", &self.registry)
			.finish_non_exhaustive()
	}
}

fn spawn_compute(
	options: &PipelineOptions,
	registry: &Arc<VersionRegistry>,
	resolver: &Arc<dyn ConfigResolver>,
	builds: &Arc<Mutex<BuildSequencer>>,
	lineage: &Lineage,
) -> ComputeQueue {
	let orchestrator = CompileOrchestrator::new(registry.clone(), resolver.clone(), builds.clone());
	WorkerQueue::spawn_with("compute", TaskClass::Relay, options.queue_capacity.max(1), orchestrator, lineage.clone())
}

#[cfg(test)]
mod tests;
