//! Caller side: debounce, request tagging and response reconciliation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;
use windtunnel_engine::ConfigSource;
use windtunnel_worker::{TaskClass, TransportError, spawn};

use crate::{CompileRequest, CompileResponse, Relay, ResponseError};

/// Response future of a [`CompileService`].
pub type CompileFuture<'a> = Pin<Box<dyn Future<Output = Result<CompileResponse, TransportError>> + Send + 'a>>;

/// Anything that can answer compile requests.
///
/// The request is ordered against other requests when `compile` returns,
/// not when the future is first polled.
pub trait CompileService: Send + Sync + 'static {
	fn compile(&self, request: CompileRequest) -> CompileFuture<'_>;
}

impl CompileService for Relay {
	fn compile(&self, request: CompileRequest) -> CompileFuture<'_> {
		Box::pin(self.submit(request))
	}
}

/// One edit from the caller. `None` fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edit {
	pub html: Option<String>,
	pub css: Option<String>,
	pub config: Option<ConfigSource>,
	pub tailwind_version: Option<String>,
	pub skip_intellisense: Option<bool>,
	pub recompile: bool,
}

impl Edit {
	/// Folds a later edit into this one. Fields the later edit sets win.
	/// The result is a recompile only if both edits are.
	fn merge(&mut self, later: Edit) {
		let Edit {
			html,
			css,
			config,
			tailwind_version,
			skip_intellisense,
			recompile,
		} = later;
		if html.is_some() {
			self.html = html;
		}
		if css.is_some() {
			self.css = css;
		}
		if config.is_some() {
			self.config = config;
		}
		if tailwind_version.is_some() {
			self.tailwind_version = tailwind_version;
		}
		if skip_intellisense.is_some() {
			self.skip_intellisense = skip_intellisense;
		}
		self.recompile = self.recompile && recompile;
	}

	fn into_request(self, request_id: String) -> CompileRequest {
		CompileRequest {
			request_id,
			html: self.html,
			css: self.css,
			config: self.config,
			tailwind_version: self.tailwind_version,
			skip_intellisense: self.skip_intellisense,
			recompile: self.recompile,
		}
	}
}

/// What the caller should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
	Loading(bool),
	Compiled {
		css: String,
		html: Option<String>,
		jit: bool,
		build_id: u64,
	},
	Error(ResponseError),
}

/// Edits not yet dispatched, merged, with the sequence of the newest.
#[derive(Default)]
struct Pending {
	edit: Option<Edit>,
	seq: u64,
}

struct Inner<S> {
	service: Arc<S>,
	debounce: Duration,
	pending: Mutex<Pending>,
	/// Last edit received.
	edits: AtomicU64,
	/// Edit sequence of the last displayed response.
	displayed: AtomicU64,
	updates: mpsc::UnboundedSender<DisplayUpdate>,
}

/// Debounces edits into compile requests and turns responses into
/// [`DisplayUpdate`]s.
///
/// Canceled responses and responses older than the last displayed one are
/// dropped silently.
pub struct Dispatcher<S> {
	inner: Arc<Inner<S>>,
}

impl<S: CompileService> Dispatcher<S> {
	pub fn new(service: Arc<S>, debounce: Duration) -> (Self, mpsc::UnboundedReceiver<DisplayUpdate>) {
		let (updates, rx) = mpsc::unbounded_channel();
		let inner = Inner {
			service,
			debounce,
			pending: Mutex::new(Pending::default()),
			edits: AtomicU64::new(0),
			displayed: AtomicU64::new(0),
			updates,
		};
		(Self { inner: Arc::new(inner) }, rx)
	}

	/// Records an edit. Edits arriving within the debounce delay are merged
	/// and dispatched together once no newer edit arrives.
	pub fn edit(&self, edit: Edit) -> JoinHandle<()> {
		let seq = {
			let mut pending = self.inner.pending.lock();
			match pending.edit.as_mut() {
				Some(merged) => merged.merge(edit),
				None => pending.edit = Some(edit),
			}
			pending.seq += 1;
			self.inner.edits.store(pending.seq, Ordering::Release);
			pending.seq
		};
		let inner = self.inner.clone();
		spawn(TaskClass::Interactive, async move {
			if !inner.debounce.is_zero() {
				tokio::time::sleep(inner.debounce).await;
			}
			let Some(response) = inner.dispatch(seq) else {
				tracing::trace!(seq, "dispatch.debounced");
				return;
			};
			let result = response.await;
			inner.reconcile(seq, result);
		})
	}
}

impl<S: CompileService> Inner<S> {
	/// Sends the merged edit if `seq` is still the newest edit. Requests
	/// reach the service in edit order.
	fn dispatch(&self, seq: u64) -> Option<CompileFuture<'_>> {
		let mut pending = self.pending.lock();
		if pending.seq != seq {
			return None;
		}
		let edit = pending.edit.take()?;
		let request_id = Uuid::new_v4().to_string();
		tracing::trace!(seq, %request_id, "dispatch.request");
		self.emit(DisplayUpdate::Loading(true));
		Some(self.service.compile(edit.into_request(request_id)))
	}
}

impl<S> Inner<S> {
	fn emit(&self, update: DisplayUpdate) {
		if self.updates.send(update).is_err() {
			tracing::trace!("dispatch.updates.closed");
		}
	}

	fn reconcile(&self, seq: u64, result: Result<CompileResponse, TransportError>) {
		let response = match result {
			Ok(response) if response.canceled => {
				tracing::trace!(seq, request_id = %response.request_id, "dispatch.canceled");
				return;
			}
			Ok(response) => Ok(response),
			Err(err) => Err(err),
		};
		if self.displayed.fetch_max(seq, Ordering::AcqRel) > seq {
			tracing::trace!(seq, "dispatch.out_of_order");
			return;
		}
		match response {
			Ok(CompileResponse { error: Some(error), .. }) => self.emit(DisplayUpdate::Error(error)),
			Ok(response) => self.emit(DisplayUpdate::Compiled {
				css: response.css.unwrap_or_default(),
				html: response.html,
				jit: response.jit,
				build_id: response.build_id,
			}),
			Err(err) => self.emit(DisplayUpdate::Error(err.into())),
		}
		if self.edits.load(Ordering::Acquire) == seq {
			self.emit(DisplayUpdate::Loading(false));
		}
	}
}

#[cfg(test)]
mod tests;
