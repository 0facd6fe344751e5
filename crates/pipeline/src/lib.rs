//! Compile dispatch pipeline.
//!
//! Requests flow from the caller-side [`Dispatcher`] through the [`Relay`],
//! which owns the last-seen inputs and the long-lived IntelliSense state,
//! to the compute unit ([`CompileOrchestrator`]) behind a single-unit
//! [`WorkerQueue`](windtunnel_worker::WorkerQueue). The compute unit
//! sequences builds and runs the engine; the relay commits state only for
//! responses that are still current when they come back.

mod compute;
mod dispatcher;
mod error;
mod lint;
mod options;
mod protocol;
mod relay;

pub use compute::{BuildSequencer, CompileOrchestrator, Compiled, ComputeOutcome, ComputeRequest, ComputeResponse};
pub use dispatcher::{CompileFuture, CompileService, DisplayUpdate, Dispatcher, Edit};
pub use error::ResponseError;
pub use lint::{LintRule, LintSettings, LintSeverity};
pub use options::PipelineOptions;
pub use protocol::{CompileRequest, CompileResponse};
pub use relay::Relay;
pub use windtunnel_worker::TransportError;
