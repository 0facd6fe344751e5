//! Worker runtime primitives shared by the compile pipeline.
//!
//! * [`TaskClass`]: scheduling class attached to every spawn for tracing.
//! * [`spawn`] / [`spawn_blocking`]: runtime entry points that run work
//!   inside a span naming its class.
//! * [`Mailbox`]: bounded FIFO mailbox with backpressure.
//! * [`GenerationClock`] / [`Supersession`] / [`Ticket`]: monotonic request
//!   generations and the single authoritative "latest submitted" marker;
//!   [`Lineage`] bundles both so replacement units share them.
//! * [`WorkerQueue`]: one execution unit draining a mailbox of requests, with
//!   exactly-one dispatch per request and supersession-based cancellation.

mod class;
mod mailbox;
mod queue;
mod token;

pub use class::{TaskClass, spawn, spawn_blocking};
pub use mailbox::{Mailbox, MailboxReceiver, MailboxSendError, MailboxSender};
pub use queue::{QueueHandler, Submission, TransportError, WorkerQueue};
pub use token::{GenerationClock, Lineage, Supersession, Ticket};
