use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Mailbox send error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxSendError {
	/// Mailbox is closed.
	Closed,
	/// Queue is full and non-blocking send was used.
	Full,
}

struct MailboxState<T> {
	queue: VecDeque<T>,
	closed: bool,
}

struct MailboxInner<T> {
	capacity: usize,
	state: Mutex<MailboxState<T>>,
	notify_recv: Notify,
	notify_send: Notify,
}

/// Multi-producer mailbox sender.
pub struct MailboxSender<T> {
	inner: Arc<MailboxInner<T>>,
}

/// Mailbox receiver.
pub struct MailboxReceiver<T> {
	inner: Arc<MailboxInner<T>>,
}

/// Bounded FIFO mailbox with backpressure.
///
/// Enqueue never reorders and never drops: a full mailbox makes
/// [`MailboxSender::send`] wait for capacity, and [`MailboxSender::try_send`]
/// report [`MailboxSendError::Full`]. The state lock is synchronous and never
/// held across an await point, so enqueue order equals call order.
pub struct Mailbox<T> {
	inner: Arc<MailboxInner<T>>,
}

impl<T> Clone for MailboxSender<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Mailbox<T> {
	/// Creates a bounded mailbox. A zero capacity is raised to one.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			inner: Arc::new(MailboxInner {
				capacity,
				state: Mutex::new(MailboxState {
					queue: VecDeque::with_capacity(capacity),
					closed: false,
				}),
				notify_recv: Notify::new(),
				notify_send: Notify::new(),
			}),
		}
	}

	/// Returns a sender handle.
	pub fn sender(&self) -> MailboxSender<T> {
		MailboxSender {
			inner: Arc::clone(&self.inner),
		}
	}

	/// Returns the receiver handle.
	pub fn receiver(&self) -> MailboxReceiver<T> {
		MailboxReceiver {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> MailboxSender<T> {
	/// Closes the mailbox. Receivers drain existing items then return `None`.
	pub fn close(&self) {
		self.inner.state.lock().closed = true;
		self.inner.notify_recv.notify_waiters();
		self.inner.notify_send.notify_waiters();
	}

	/// Returns true once the mailbox has been closed.
	pub fn is_closed(&self) -> bool {
		self.inner.state.lock().closed
	}

	/// Non-blocking enqueue.
	pub fn try_send(&self, msg: T) -> Result<(), (T, MailboxSendError)> {
		let mut state = self.inner.state.lock();
		if state.closed {
			return Err((msg, MailboxSendError::Closed));
		}
		if state.queue.len() >= self.inner.capacity {
			return Err((msg, MailboxSendError::Full));
		}
		state.queue.push_back(msg);
		drop(state);
		self.inner.notify_recv.notify_one();
		Ok(())
	}

	/// Enqueue, waiting for capacity when the mailbox is full.
	pub async fn send(&self, mut msg: T) -> Result<(), MailboxSendError> {
		loop {
			// Register before checking capacity to avoid a lost wakeup.
			let notified = self.inner.notify_send.notified();
			match self.try_send(msg) {
				Ok(()) => return Ok(()),
				Err((_, MailboxSendError::Closed)) => return Err(MailboxSendError::Closed),
				Err((returned, MailboxSendError::Full)) => msg = returned,
			}
			notified.await;
		}
	}

	/// Returns current queue length.
	pub fn len(&self) -> usize {
		self.inner.state.lock().queue.len()
	}

	/// Returns true when nothing is queued.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns queue capacity.
	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}
}

impl<T> MailboxReceiver<T> {
	/// Receives one message. Returns `None` once the mailbox is closed and drained.
	pub async fn recv(&self) -> Option<T> {
		loop {
			let notified = self.inner.notify_recv.notified();
			{
				let mut state = self.inner.state.lock();
				if let Some(msg) = state.queue.pop_front() {
					drop(state);
					self.inner.notify_send.notify_one();
					return Some(msg);
				}
				if state.closed {
					return None;
				}
			}
			notified.await;
		}
	}

	/// Closes the mailbox and drops everything still queued.
	///
	/// Used when the consuming unit goes away so pending senders observe the
	/// failure instead of waiting forever.
	pub fn close_and_discard(&self) -> usize {
		let discarded = {
			let mut state = self.inner.state.lock();
			state.closed = true;
			std::mem::take(&mut state.queue)
		};
		self.inner.notify_recv.notify_waiters();
		self.inner.notify_send.notify_waiters();
		let count = discarded.len();
		drop(discarded);
		count
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn try_send_returns_full_when_at_capacity() {
		let mailbox = Mailbox::new(2);
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		assert!(tx.try_send(1u32).is_ok());
		assert!(tx.try_send(2).is_ok());
		assert_eq!(tx.try_send(3).err().map(|(_, e)| e), Some(MailboxSendError::Full));

		tx.close();
		assert_eq!(rx.recv().await, Some(1));
		assert_eq!(rx.recv().await, Some(2));
		assert_eq!(rx.recv().await, None);
	}

	#[tokio::test]
	async fn send_waits_until_capacity_freed() {
		let mailbox = Mailbox::new(1);
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		tx.send(1u32).await.unwrap();
		let tx2 = tx.clone();
		let pending = tokio::spawn(async move { tx2.send(2).await });

		tokio::time::sleep(Duration::from_millis(10)).await;
		assert!(!pending.is_finished(), "send should park while full");

		assert_eq!(rx.recv().await, Some(1));
		let sent = tokio::time::timeout(Duration::from_millis(200), pending)
			.await
			.expect("send should unblock after pop")
			.unwrap();
		assert_eq!(sent, Ok(()));
		assert_eq!(rx.recv().await, Some(2));
	}

	#[tokio::test]
	async fn close_and_discard_wakes_blocked_senders() {
		let mailbox = Mailbox::new(1);
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		tx.send(1u32).await.unwrap();
		let tx2 = tx.clone();
		let pending = tokio::spawn(async move { tx2.send(2).await });
		tokio::time::sleep(Duration::from_millis(10)).await;

		assert_eq!(rx.close_and_discard(), 1);
		let result = tokio::time::timeout(Duration::from_millis(200), pending).await.unwrap().unwrap();
		assert_eq!(result, Err(MailboxSendError::Closed));
		assert!(tx.is_closed());
	}
}
