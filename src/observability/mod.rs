//! Observability for master recovery
//!
//! - Structured logs through `tracing`
//! - Typed lifecycle events
//! - An observer that keeps every emitted event
//!
//! Observability is read-only: a logging failure never changes the outcome
//! of a recovery attempt.

mod events;
mod observer;

pub use events::RecoveryEvent;
pub use observer::RecoveryObserver;

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g.
/// `BINLOG_RECOVERY_LOG="binlog_recovery=debug,warn"`.
pub const LOG_ENV: &str = "BINLOG_RECOVERY_LOG";

/// Observability error
///
/// Never fatal.
#[derive(Debug)]
pub struct ObservabilityError {
    message: String,
}

impl ObservabilityError {
    /// Create a new observability error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        "CDC_OBSERVABILITY_FAILED"
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code(), self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Install a global fmt subscriber.
///
/// The filter comes from [`LOG_ENV`] when set, otherwise from
/// `default_directive`. Fails if a global subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| ObservabilityError::new(format!("bad log filter: {}", e)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ObservabilityError::new(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_error_display() {
        let err = ObservabilityError::new("subscriber already set");
        let display = err.to_string();
        assert!(display.contains("CDC_OBSERVABILITY_FAILED"));
        assert!(display.contains("subscriber already set"));
    }

    #[test]
    fn test_bad_default_directive() {
        // Only reachable when the env var is unset.
        if std::env::var(LOG_ENV).is_err() {
            assert!(init_logging("binlog_recovery=notalevel").is_err());
        }
    }
}
