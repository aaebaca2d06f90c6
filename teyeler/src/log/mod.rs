//! Injected logging collaborator.
//!
//! Engine components never reach for a global logger. They receive an
//! `Arc<dyn Logger>` and report through it, so the padding warning raised by
//! tile extraction or the per-level progress of the pyramid walk can be
//! routed to `tracing`, captured in a test, or discarded.
//!
//! - [`Logger`]: the interface components depend on
//! - [`TracingLogger`]: forwards to the `tracing` macros
//! - [`NoOpLogger`]: discards everything
//! - [`RecordingLogger`]: keeps messages in memory for inspection
//!
//! ```
//! use std::sync::Arc;
//! use teyeler::log::{Logger, NoOpLogger};
//! use teyeler::log_info;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
//! log_info!(logger, "tiling {} levels", 3);
//! ```

mod noop;
mod recording;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use recording::{LogRecord, RecordingLogger};
pub use tracing_adapter::TracingLogger;
