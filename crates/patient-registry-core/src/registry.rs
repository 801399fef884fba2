//! Composition root: one gateway plus the readiness state that gates it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::GatewayConfig;
use crate::gateway::StorageGateway;
use crate::readiness::{Readiness, ReadinessState};

/// Application-level owner of the storage gateway.
///
/// Consumers receive a clone (or a reference) and check
/// [`PatientRegistry::readiness`] before issuing queries.
#[derive(Clone)]
pub struct PatientRegistry {
    gateway: Arc<StorageGateway>,
    readiness: Arc<ReadinessState>,
}

impl PatientRegistry {
    /// Build an unstarted registry. Readiness is `Loading` until [`start`]
    /// or [`start_in_background`] runs.
    ///
    /// [`start`]: PatientRegistry::start
    /// [`start_in_background`]: PatientRegistry::start_in_background
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            gateway: Arc::new(StorageGateway::new(config)),
            readiness: Arc::new(ReadinessState::new()),
        }
    }

    /// Initialize on the calling thread.
    pub fn start(&self) -> Readiness {
        self.readiness.initialize(&self.gateway)
    }

    /// Initialize on a worker thread; observe progress through
    /// [`ReadinessState::wait_settled`].
    pub fn start_in_background(&self) -> JoinHandle<Readiness> {
        let gateway = Arc::clone(&self.gateway);
        let readiness = Arc::clone(&self.readiness);
        thread::spawn(move || readiness.initialize(&gateway))
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    pub fn readiness(&self) -> &ReadinessState {
        &self.readiness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;

    #[test]
    fn test_start_then_query() {
        let registry = PatientRegistry::new(GatewayConfig::in_memory());
        assert_eq!(registry.readiness().current(), Readiness::Loading);

        assert_eq!(registry.start(), Readiness::Ready);
        let id = registry
            .gateway()
            .register_patient(&NewPatient::new("Ana", "Rao", "1990-05-01", "female"))
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_background_start_is_observable() {
        let registry = PatientRegistry::new(GatewayConfig::in_memory());
        let worker = registry.start_in_background();

        let consumer = registry.clone();
        assert_eq!(consumer.readiness().wait_settled(None), Readiness::Ready);
        assert_eq!(worker.join().unwrap(), Readiness::Ready);
        assert_eq!(consumer.gateway().initializations(), 1);
    }
}
