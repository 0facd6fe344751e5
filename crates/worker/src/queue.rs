//! Single-unit request queue.
//!
//! One execution unit drains a FIFO mailbox and runs a [`QueueHandler`] for
//! each request, strictly one at a time. Submission claims a fresh generation
//! synchronously, before any await, so the latest-submitted marker always
//! reflects call order even when several submissions are outstanding.
//!
//! Cancellation is result-based: a superseded request still runs to
//! completion, and the handler consults its [`Ticket`] to decide whether its
//! result is authoritative.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::mailbox::{Mailbox, MailboxReceiver, MailboxSendError, MailboxSender};
use crate::token::{Lineage, Ticket};
use crate::{TaskClass, spawn};

/// Transport failure between a submitter and the execution unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
	/// The execution unit is gone; the request was never accepted.
	#[error("worker queue is closed")]
	Closed,
	/// The execution unit went away while the request was pending.
	#[error("worker dropped the request before responding")]
	Dropped,
}

/// Request processor owned by the execution unit.
#[async_trait]
pub trait QueueHandler: Send + 'static {
	/// Request payload.
	type Request: Send + 'static;
	/// Response payload.
	type Response: Send + 'static;

	/// Processes one request. `ticket` reports whether a newer request has
	/// been submitted since this one.
	async fn handle(&mut self, request: Self::Request, ticket: &Ticket) -> Self::Response;
}

struct Envelope<Req, Resp> {
	ticket: Ticket,
	request: Req,
	reply: oneshot::Sender<Resp>,
}

/// Pending response for one submitted request.
///
/// The generation was claimed when the submission was created; awaiting it
/// yields the handler's response or a [`TransportError`].
pub struct Submission<Resp> {
	ticket: Ticket,
	state: SubmissionState<Resp>,
}

enum SubmissionState<Resp> {
	Waiting(oneshot::Receiver<Resp>),
	Backpressured(Pin<Box<dyn Future<Output = Result<Resp, TransportError>> + Send>>),
	Failed(Option<TransportError>),
}

impl<Resp> Submission<Resp> {
	/// Returns the ticket claimed for this submission.
	pub fn ticket(&self) -> &Ticket {
		&self.ticket
	}
}

impl<Resp: Send + 'static> Future for Submission<Resp> {
	type Output = Result<Resp, TransportError>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();
		match &mut this.state {
			SubmissionState::Waiting(rx) => Pin::new(rx).poll(cx).map_err(|_| TransportError::Dropped),
			SubmissionState::Backpressured(fut) => fut.as_mut().poll(cx),
			SubmissionState::Failed(err) => Poll::Ready(Err(err.take().unwrap_or(TransportError::Closed))),
		}
	}
}

/// One execution unit plus its request mailbox.
pub struct WorkerQueue<Req, Resp> {
	name: String,
	sender: MailboxSender<Envelope<Req, Resp>>,
	lineage: Lineage,
	shutdown: CancellationToken,
	task: JoinHandle<()>,
}

impl<Req, Resp> WorkerQueue<Req, Resp>
where
	Req: Send + 'static,
	Resp: Send + 'static,
{
	/// Spawns the execution unit running `handler` with a lineage of its own.
	pub fn spawn<H>(name: impl Into<String>, class: TaskClass, capacity: usize, handler: H) -> Self
	where
		H: QueueHandler<Request = Req, Response = Resp>,
	{
		Self::spawn_with(name, class, capacity, handler, Lineage::new())
	}

	/// Spawns the execution unit running `handler`; tickets come from
	/// `lineage`, which may be shared with the unit this one replaces.
	pub fn spawn_with<H>(name: impl Into<String>, class: TaskClass, capacity: usize, handler: H, lineage: Lineage) -> Self
	where
		H: QueueHandler<Request = Req, Response = Resp>,
	{
		let name = name.into();
		let mailbox = Mailbox::new(capacity);
		let shutdown = CancellationToken::new();
		let task = spawn(class, run_unit(name.clone(), handler, mailbox.receiver(), shutdown.clone()));
		Self {
			name,
			sender: mailbox.sender(),
			lineage,
			shutdown,
			task,
		}
	}

	/// Submits a request.
	///
	/// The request's generation becomes the latest claim before this function
	/// returns, so every earlier submission is superseded from this point on.
	pub fn submit(&self, request: Req) -> Submission<Resp> {
		let ticket = self.lineage.issue();
		let generation = ticket.generation();

		let (reply, rx) = oneshot::channel();
		let envelope = Envelope {
			ticket: ticket.clone(),
			request,
			reply,
		};

		let state = match self.sender.try_send(envelope) {
			Ok(()) => {
				tracing::trace!(queue = %self.name, generation, pending = self.sender.len(), "queue.submit");
				SubmissionState::Waiting(rx)
			}
			Err((envelope, MailboxSendError::Full)) => {
				tracing::debug!(queue = %self.name, generation, "queue.submit.backpressure");
				let sender = self.sender.clone();
				SubmissionState::Backpressured(Box::pin(async move {
					sender.send(envelope).await.map_err(|_| TransportError::Closed)?;
					rx.await.map_err(|_| TransportError::Dropped)
				}))
			}
			Err((_, MailboxSendError::Closed)) => SubmissionState::Failed(Some(TransportError::Closed)),
		};

		Submission { ticket, state }
	}

	/// Marks every submission older than `generation` as superseded.
	pub fn cancel_all_before(&self, generation: u64) {
		self.lineage.supersede_before(generation);
	}

	/// Returns the latest claimed generation.
	pub fn latest(&self) -> u64 {
		self.lineage.latest()
	}

	/// Returns true once the execution unit is unavailable.
	pub fn is_closed(&self) -> bool {
		self.sender.is_closed() || self.task.is_finished()
	}

	/// Stops the execution unit. Pending submissions, including the one
	/// being handled, fail with [`TransportError::Dropped`].
	pub fn shutdown(&self) {
		self.shutdown.cancel();
		self.sender.close();
		self.task.abort();
	}
}

impl<Req, Resp> Drop for WorkerQueue<Req, Resp> {
	fn drop(&mut self) {
		self.shutdown.cancel();
		self.sender.close();
		self.task.abort();
	}
}

/// Closes the mailbox when the unit exits, including by panic.
struct UnitGuard<'a, T> {
	name: &'a str,
	receiver: &'a MailboxReceiver<T>,
}

impl<T> Drop for UnitGuard<'_, T> {
	fn drop(&mut self) {
		let discarded = self.receiver.close_and_discard();
		if std::thread::panicking() {
			tracing::warn!(queue = %self.name, discarded, "queue.unit.panicked");
		} else {
			tracing::debug!(queue = %self.name, discarded, "queue.unit.stopped");
		}
	}
}

async fn run_unit<H>(name: String, mut handler: H, receiver: MailboxReceiver<Envelope<H::Request, H::Response>>, shutdown: CancellationToken)
where
	H: QueueHandler,
{
	let _guard = UnitGuard { name: &name, receiver: &receiver };
	loop {
		let envelope = tokio::select! {
			biased;
			_ = shutdown.cancelled() => break,
			next = receiver.recv() => match next {
				Some(envelope) => envelope,
				None => break,
			},
		};

		let Envelope { ticket, request, reply } = envelope;
		tracing::trace!(queue = %name, generation = ticket.generation(), "queue.dispatch");
		let response = handler.handle(request, &ticket).await;
		if reply.send(response).is_err() {
			tracing::trace!(queue = %name, generation = ticket.generation(), "queue.reply.unobserved");
		}
	}
}
