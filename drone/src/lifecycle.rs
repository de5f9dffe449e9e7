//! Observers managing suite-wide state: creating the context and registry when the suite starts,
//! and filling the registry with implementations discovered by the service loader. A registry
//! shared by another runtime is reused as is.

use crate::event::TestLifecycleEvent;
use crate::runtime::{DroneState, LifecycleObserver};
use drone_spi::context::DroneContext;
use drone_spi::error::{DroneError, IllegalStateError};
use std::sync::Arc;
use tracing::{debug, info};

/// Creates suite state on `BeforeSuite` and drops it on `AfterSuite`. Runs before all other
/// observers for setup events and after them for teardown.
#[derive(Default, Debug)]
pub struct DroneLifecycleManager;

impl LifecycleObserver for DroneLifecycleManager {
    fn on_event(
        &self,
        event: &TestLifecycleEvent,
        state: &mut DroneState,
    ) -> Result<(), DroneError> {
        match event {
            TestLifecycleEvent::BeforeSuite => {
                if state.is_active() {
                    return Err(IllegalStateError::SuiteAlreadyStarted.into());
                }

                debug!("Creating drone context and registry.");

                state.registry = Some(state.shared_registry().cloned().unwrap_or_default());
                state.context = Some(DroneContext::default());
            }
            TestLifecycleEvent::AfterSuite => {
                debug!("Dropping drone context and registry.");

                state.context = None;
                state.registry = None;
            }
            _ => {}
        }

        Ok(())
    }

    fn priority(&self) -> i8 {
        i8::MAX
    }
}

/// Registers all implementations provided by the service loader on `BeforeSuite`, unless the
/// registry is shared.
#[derive(Default, Debug)]
pub struct DroneRegistrar;

impl LifecycleObserver for DroneRegistrar {
    fn on_event(
        &self,
        event: &TestLifecycleEvent,
        state: &mut DroneState,
    ) -> Result<(), DroneError> {
        if !matches!(event, TestLifecycleEvent::BeforeSuite) {
            return Ok(());
        }

        if state.shared_registry().is_some() {
            debug!("Using shared drone registry.");
            return Ok(());
        }

        let service_loader = state.service_loader().clone();
        let registry = state
            .registry
            .as_mut()
            .ok_or(IllegalStateError::SuiteNotStarted)?;
        let registry = Arc::make_mut(registry);

        for configurator in service_loader.configurators() {
            registry.register_configurator(configurator);
        }

        for instantiator in service_loader.instantiators() {
            registry.register_instantiator(instantiator);
        }

        for destructor in service_loader.destructors() {
            registry.register_destructor(destructor);
        }

        info!(
            "Registered drone implementations for: {:?}",
            registry.registered_types()
        );

        Ok(())
    }

    fn priority(&self) -> i8 {
        i8::MAX - 1
    }
}
