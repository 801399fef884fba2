//! Startup readiness of the storage gateway.
//!
//! ```text
//!            acquire() ok
//!  Loading ───────────────▶ Ready
//!     │
//!     │ acquire() err
//!     ▼
//!  Failed(message)
//! ```
//!
//! The state settles once. Retrying after a failure means building a new
//! [`ReadinessState`] (a reload).

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::gateway::StorageGateway;

/// Message shown to every consumer when initialization fails.
pub const INIT_FAILED_MESSAGE: &str =
    "Database initialization failed. Please reload the application to retry";

/// Gateway readiness as seen by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Readiness {
    Loading,
    Ready,
    Failed(String),
}

impl Readiness {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Readiness::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Readiness::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Observable, one-shot readiness flag.
#[derive(Debug)]
pub struct ReadinessState {
    status: Mutex<Readiness>,
    settled: Condvar,
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessState {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(Readiness::Loading),
            settled: Condvar::new(),
        }
    }

    fn status(&self) -> MutexGuard<'_, Readiness> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire the gateway and settle on the outcome.
    ///
    /// Once settled, further calls return the settled value without touching
    /// the gateway.
    pub fn initialize(&self, gateway: &StorageGateway) -> Readiness {
        {
            let status = self.status();
            if status.is_settled() {
                return status.clone();
            }
        }

        let outcome = match gateway.acquire() {
            Ok(_) => {
                info!("Patient registry ready");
                Readiness::Ready
            }
            Err(e) => {
                warn!(error = %e, "Patient registry failed to start");
                Readiness::Failed(INIT_FAILED_MESSAGE.to_string())
            }
        };

        let mut status = self.status();
        if !status.is_settled() {
            *status = outcome;
            self.settled.notify_all();
        }
        status.clone()
    }

    pub fn current(&self) -> Readiness {
        self.status().clone()
    }

    pub fn is_ready(&self) -> bool {
        *self.status() == Readiness::Ready
    }

    /// Block until the state settles. With a timeout, returns
    /// [`Readiness::Loading`] if it elapses first.
    pub fn wait_settled(&self, timeout: Option<Duration>) -> Readiness {
        let status = self.status();
        let status = match timeout {
            None => self
                .settled
                .wait_while(status, |s| !s.is_settled())
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                self.settled
                    .wait_timeout_while(status, timeout, |s| !s.is_settled())
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        };
        status.clone()
    }
}
