//! [DroneRuntime] ties all drone components together. It owns the [DroneState] - the service
//! loader, descriptor, registry and context - and dispatches [TestLifecycleEvent]s to
//! [LifecycleObserver]s. The host test runner fires events and calls
//! [TestEnricher](crate::enricher::TestEnricher) methods on the runtime.
//!
//! A runtime is meant to be driven sequentially. Test classes running concurrently should use
//! separate runtimes, which keeps their class-scoped drones isolated. Such runtimes can share a
//! single registry via [DroneRuntimeBuilder::with_registry], so implementations are discovered
//! only once.

use crate::config::DroneConfig;
use crate::configurator::DroneConfigurator;
use crate::destructor::DroneDestructor;
use crate::enricher::{DroneTestEnricher, TestEnricher};
use crate::event::TestLifecycleEvent;
use crate::lifecycle::{DroneLifecycleManager, DroneRegistrar};
use crate::logging::init_tracing;
use drone_spi::context::DroneContext;
use drone_spi::descriptor::ArquillianDescriptor;
use drone_spi::drone_point::{DronePoint, Qualifier};
use drone_spi::error::{DroneError, IllegalStateError};
use drone_spi::extension::{ServiceLoader, StaticServiceLoader};
use drone_spi::injection::{DroneInjected, TestMethod};
use drone_spi::registry::DroneRegistry;
use drone_spi::service::DroneInstanceAnyPtr;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use tracing::debug;

pub type ServiceLoaderPtr = Arc<dyn ServiceLoader + Send + Sync>;
pub type LifecycleObserverPtr = Box<dyn LifecycleObserver + Send + Sync>;

/// State shared by drone components for the duration of a suite.
pub struct DroneState {
    service_loader: ServiceLoaderPtr,
    descriptor: ArquillianDescriptor,
    shared_registry: Option<Arc<DroneRegistry>>,
    pub(crate) registry: Option<Arc<DroneRegistry>>,
    pub(crate) context: Option<DroneContext>,
}

impl DroneState {
    pub fn new(service_loader: ServiceLoaderPtr, descriptor: ArquillianDescriptor) -> Self {
        Self {
            service_loader,
            descriptor,
            shared_registry: None,
            registry: None,
            context: None,
        }
    }

    /// Uses an already populated registry for suites instead of creating and filling a new one.
    pub fn with_shared_registry(mut self, registry: Arc<DroneRegistry>) -> Self {
        self.shared_registry = Some(registry);
        self
    }

    #[inline]
    pub fn shared_registry(&self) -> Option<&Arc<DroneRegistry>> {
        self.shared_registry.as_ref()
    }

    #[inline]
    pub fn service_loader(&self) -> &ServiceLoaderPtr {
        &self.service_loader
    }

    #[inline]
    pub fn descriptor(&self) -> &ArquillianDescriptor {
        &self.descriptor
    }

    /// Checks if a suite is running, i.e. registry and context exist.
    pub fn is_active(&self) -> bool {
        self.registry.is_some() && self.context.is_some()
    }

    pub fn registry(&self) -> Result<Arc<DroneRegistry>, IllegalStateError> {
        self.registry
            .clone()
            .ok_or(IllegalStateError::SuiteNotStarted)
    }

    pub fn context(&self) -> Result<&DroneContext, IllegalStateError> {
        self.context
            .as_ref()
            .ok_or(IllegalStateError::SuiteNotStarted)
    }

    pub fn context_mut(&mut self) -> Result<&mut DroneContext, IllegalStateError> {
        self.context
            .as_mut()
            .ok_or(IllegalStateError::SuiteNotStarted)
    }
}

/// Returns the qualifier used to look up implementations and descriptor sections for a point.
pub(crate) fn lookup_qualifier(point: &DronePoint) -> Result<Option<&Qualifier>, DroneError> {
    point
        .single_qualifier()
        .map_err(|_| IllegalStateError::AmbiguousQualifier(point.clone()).into())
}

/// Component reacting to [TestLifecycleEvent]s.
#[cfg_attr(test, automock)]
pub trait LifecycleObserver {
    fn on_event(
        &self,
        event: &TestLifecycleEvent,
        state: &mut DroneState,
    ) -> Result<(), DroneError>;

    /// Higher priorities observe setup events first and teardown events last. Default 0.
    fn priority(&self) -> i8 {
        0
    }
}

/// Builder for [DroneRuntime] with sensible defaults.
pub struct DroneRuntimeBuilder {
    service_loader: ServiceLoaderPtr,
    descriptor: ArquillianDescriptor,
    registry: Option<Arc<DroneRegistry>>,
    observers: Vec<LifecycleObserverPtr>,
}

impl Default for DroneRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DroneRuntimeBuilder {
    /// Creates a builder using statically submitted extensions, an empty descriptor and the
    /// standard observers.
    pub fn new() -> Self {
        Self {
            service_loader: Arc::new(StaticServiceLoader::new()),
            descriptor: Default::default(),
            registry: None,
            observers: vec![
                Box::<DroneLifecycleManager>::default() as LifecycleObserverPtr,
                Box::<DroneRegistrar>::default() as LifecycleObserverPtr,
                Box::<DroneConfigurator>::default() as LifecycleObserverPtr,
                Box::<DroneDestructor>::default() as LifecycleObserverPtr,
            ],
        }
    }

    /// Creates a builder configured by [DroneConfig]: installs the tracing logger if requested and
    /// loads the descriptor file.
    pub fn from_config(config: &DroneConfig) -> Result<Self, DroneError> {
        if config.install_tracing_logger {
            init_tracing();
        }

        let descriptor = ArquillianDescriptor::from_file(&config.descriptor_file)?;
        Ok(Self::new().with_descriptor(descriptor))
    }

    /// Same as [from_config](Self::from_config), but with config read from the `drone.json` file
    /// and `DRONE_` environment variables.
    pub fn from_environment() -> Result<Self, DroneError> {
        let config = DroneConfig::init_from_environment()
            .map_err(|error| DroneError::Config(Arc::new(error)))?;
        Self::from_config(&config)
    }

    pub fn with_service_loader(mut self, service_loader: ServiceLoaderPtr) -> Self {
        self.service_loader = service_loader;
        self
    }

    pub fn with_descriptor(mut self, descriptor: ArquillianDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Shares a registry populated by another runtime. Suites started by the built runtime skip
    /// registration and use it as is.
    pub fn with_registry(mut self, registry: Arc<DroneRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Adds a custom observer.
    pub fn with_observer(mut self, observer: LifecycleObserverPtr) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> DroneRuntime {
        let state = DroneState::new(self.service_loader, self.descriptor);
        let state = match self.registry {
            Some(registry) => state.with_shared_registry(registry),
            None => state,
        };

        DroneRuntime::new(state, self.observers)
    }
}

/// Entry point for the host test runner. Please see module-level documentation.
pub struct DroneRuntime {
    state: DroneState,
    observers: Vec<LifecycleObserverPtr>,
    enricher: DroneTestEnricher,
}

impl DroneRuntime {
    pub fn new(state: DroneState, observers: Vec<LifecycleObserverPtr>) -> Self {
        Self {
            state,
            observers: observers
                .into_iter()
                .sorted_by_key(|observer| -(observer.priority() as i16))
                .collect(),
            enricher: Default::default(),
        }
    }

    /// Dispatches the event to all observers. Stops at the first error.
    pub fn fire(&mut self, event: TestLifecycleEvent) -> Result<(), DroneError> {
        debug!("Firing {}.", event);

        if event.is_teardown() {
            for observer in self.observers.iter().rev() {
                observer.on_event(&event, &mut self.state)?;
            }
        } else {
            for observer in &self.observers {
                observer.on_event(&event, &mut self.state)?;
            }
        }

        Ok(())
    }

    #[inline]
    pub fn state(&self) -> &DroneState {
        &self.state
    }

    /// Returns the context of the running suite.
    #[inline]
    pub fn context(&self) -> Option<&DroneContext> {
        self.state.context.as_ref()
    }

    #[inline]
    pub fn context_mut(&mut self) -> Option<&mut DroneContext> {
        self.state.context.as_mut()
    }

    /// Returns the registry of the running suite, which can be shared with other runtimes.
    #[inline]
    pub fn registry(&self) -> Option<Arc<DroneRegistry>> {
        self.state.registry.clone()
    }
}

impl TestEnricher for DroneRuntime {
    fn enrich(&mut self, instance: &mut dyn DroneInjected) -> Result<(), DroneError> {
        self.enricher.enrich_with(&mut self.state, instance)
    }

    fn resolve(
        &mut self,
        method: &TestMethod,
    ) -> Result<Vec<Option<DroneInstanceAnyPtr>>, DroneError> {
        self.enricher.resolve_with(&mut self.state, method)
    }
}
