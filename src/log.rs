//! Error logging collaborator.
//!
//! Every error is reported to an [`ErrorLog`] at the point it is detected,
//! before it is returned or handed to a completion callback. The default
//! [`TracingLog`] emits `tracing` events; tests swap in their own sink.

use crate::client::ClientError;

/// Receives errors at the point of detection.
pub trait ErrorLog: Send + Sync {
    /// Record `error`; `context` names the phase that failed.
    fn error(&self, context: &str, error: &ClientError);
}

/// Forwards errors to `tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl ErrorLog for TracingLog {
    fn error(&self, context: &str, error: &ClientError) {
        tracing::error!(context, error = %error, "agent task error");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl ErrorLog for NoopLog {
    fn error(&self, _context: &str, _error: &ClientError) {}
}
