//! Discovery of pluggable drone implementations. Modules providing support for concrete drone
//! types implement [LoadableExtension] and register their services with an [ExtensionBuilder]:
//!
//! ```
//! use drone_spi::descriptor::ArquillianDescriptor;
//! use drone_spi::drone_point::{DronePoint, DroneType};
//! use drone_spi::error::ErrorPtr;
//! use drone_spi::extension::{ExtensionBuilder, LoadableExtension};
//! use drone_spi::service::{
//!     Configurator, Destructor, DroneConfigurationAnyPtr, DroneInstanceAnyPtr, Instantiator,
//! };
//! use std::sync::Arc;
//!
//! struct Browser;
//!
//! struct BrowserFactory;
//!
//! impl Configurator for BrowserFactory {
//!     fn drone_type(&self) -> DroneType {
//!         DroneType::of::<Browser>()
//!     }
//!
//!     fn create_configuration(
//!         &self,
//!         _descriptor: &ArquillianDescriptor,
//!         _point: &DronePoint,
//!     ) -> Result<DroneConfigurationAnyPtr, ErrorPtr> {
//!         Ok(Arc::new(()))
//!     }
//! }
//!
//! impl Instantiator for BrowserFactory {
//!     fn drone_type(&self) -> DroneType {
//!         DroneType::of::<Browser>()
//!     }
//!
//!     fn create_instance(
//!         &self,
//!         _configuration: DroneConfigurationAnyPtr,
//!     ) -> Result<DroneInstanceAnyPtr, ErrorPtr> {
//!         Ok(Arc::new(Browser))
//!     }
//! }
//!
//! impl Destructor for BrowserFactory {
//!     fn drone_type(&self) -> DroneType {
//!         DroneType::of::<Browser>()
//!     }
//!
//!     fn destroy_instance(&self, _instance: DroneInstanceAnyPtr) -> Result<(), ErrorPtr> {
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct BrowserExtension;
//!
//! impl LoadableExtension for BrowserExtension {
//!     fn register(&self, builder: &mut ExtensionBuilder) {
//!         builder.factory(BrowserFactory);
//!     }
//! }
//!
//! // makes the extension visible to StaticServiceLoader::new()
//! drone_spi::submit_extension!(BrowserExtension);
//! ```
//!
//! The registered services are exposed to the framework via a [ServiceLoader].

use crate::service::{
    Configurator, ConfiguratorPtr, Destructor, DestructorPtr, Instantiator, InstantiatorPtr,
};
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use tracing::debug;

pub type LoadableExtensionPtr = Box<dyn LoadableExtension + Send + Sync>;

/// Entry point for modules contributing drone implementations.
pub trait LoadableExtension {
    fn register(&self, builder: &mut ExtensionBuilder);
}

/// Collects services registered by [LoadableExtension]s.
#[derive(Clone, Default)]
pub struct ExtensionBuilder {
    configurators: Vec<ConfiguratorPtr>,
    instantiators: Vec<InstantiatorPtr>,
    destructors: Vec<DestructorPtr>,
}

impl ExtensionBuilder {
    pub fn configurator(&mut self, configurator: ConfiguratorPtr) -> &mut Self {
        self.configurators.push(configurator);
        self
    }

    pub fn instantiator(&mut self, instantiator: InstantiatorPtr) -> &mut Self {
        self.instantiators.push(instantiator);
        self
    }

    pub fn destructor(&mut self, destructor: DestructorPtr) -> &mut Self {
        self.destructors.push(destructor);
        self
    }

    /// Registers a single implementation for all three roles.
    pub fn factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Configurator + Instantiator + Destructor + Send + Sync + 'static,
    {
        let factory = Arc::new(factory);
        self.configurator(factory.clone())
            .instantiator(factory.clone())
            .destructor(factory)
    }
}

/// Source of all available implementations of each role.
#[cfg_attr(test, automock)]
pub trait ServiceLoader {
    fn configurators(&self) -> Vec<ConfiguratorPtr>;

    fn instantiators(&self) -> Vec<InstantiatorPtr>;

    fn destructors(&self) -> Vec<DestructorPtr>;
}

/// [ServiceLoader] gathering services from extensions submitted with
/// [submit_extension](crate::submit_extension) and ones added explicitly.
#[derive(Clone, Default)]
pub struct StaticServiceLoader {
    services: ExtensionBuilder,
}

impl StaticServiceLoader {
    /// Creates a loader containing all statically submitted extensions.
    pub fn new() -> Self {
        let mut loader = Self::default();
        for registerer in inventory::iter::<internal::ExtensionRegisterer> {
            loader.add_extension((registerer.create)().as_ref());
        }

        loader
    }

    pub fn with_extension<E: LoadableExtension>(mut self, extension: E) -> Self {
        self.add_extension(&extension);
        self
    }

    pub fn add_extension(&mut self, extension: &dyn LoadableExtension) {
        extension.register(&mut self.services);
        debug!(
            "Loaded extension services: {} configurators, {} instantiators, {} destructors.",
            self.services.configurators.len(),
            self.services.instantiators.len(),
            self.services.destructors.len()
        );
    }
}

impl ServiceLoader for StaticServiceLoader {
    fn configurators(&self) -> Vec<ConfiguratorPtr> {
        self.services.configurators.clone()
    }

    fn instantiators(&self) -> Vec<InstantiatorPtr> {
        self.services.instantiators.clone()
    }

    fn destructors(&self) -> Vec<DestructorPtr> {
        self.services.destructors.clone()
    }
}

/// Makes a [LoadableExtension] implementing [Default] discoverable by
/// [StaticServiceLoader::new].
#[macro_export]
macro_rules! submit_extension {
    ($extension:ty) => {
        $crate::extension::internal::submit! {
            $crate::extension::internal::ExtensionRegisterer {
                create: $crate::extension::internal::create_extension::<$extension>
            }
        }
    };
}

#[doc(hidden)]
pub mod internal {
    use crate::extension::{LoadableExtension, LoadableExtensionPtr};
    use inventory::collect;
    pub use inventory::submit;

    pub struct ExtensionRegisterer {
        pub create: fn() -> LoadableExtensionPtr,
    }

    pub fn create_extension<E: LoadableExtension + Default + Send + Sync + 'static>(
    ) -> LoadableExtensionPtr {
        Box::<E>::default()
    }

    collect!(ExtensionRegisterer);
}

#[cfg(test)]
mod tests {
    use crate::drone_point::{DronePoint, DroneType};
    use crate::descriptor::ArquillianDescriptor;
    use crate::error::ErrorPtr;
    use crate::extension::{ExtensionBuilder, LoadableExtension, ServiceLoader, StaticServiceLoader};
    use crate::service::{
        Configurator, Destructor, DroneConfigurationAnyPtr, DroneInstanceAnyPtr, Instantiator,
        MockDestructor,
    };
    use std::sync::Arc;

    struct TestDrone;

    struct TestFactory;

    impl Configurator for TestFactory {
        fn drone_type(&self) -> DroneType {
            DroneType::of::<TestDrone>()
        }

        fn create_configuration(
            &self,
            _descriptor: &ArquillianDescriptor,
            _point: &DronePoint,
        ) -> Result<DroneConfigurationAnyPtr, ErrorPtr> {
            Ok(Arc::new(()))
        }
    }

    impl Instantiator for TestFactory {
        fn drone_type(&self) -> DroneType {
            DroneType::of::<TestDrone>()
        }

        fn create_instance(
            &self,
            _configuration: DroneConfigurationAnyPtr,
        ) -> Result<DroneInstanceAnyPtr, ErrorPtr> {
            Ok(Arc::new(TestDrone))
        }
    }

    impl Destructor for TestFactory {
        fn drone_type(&self) -> DroneType {
            DroneType::of::<TestDrone>()
        }

        fn destroy_instance(&self, _instance: DroneInstanceAnyPtr) -> Result<(), ErrorPtr> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestExtension;

    impl LoadableExtension for TestExtension {
        fn register(&self, builder: &mut ExtensionBuilder) {
            builder
                .factory(TestFactory)
                .destructor(Arc::new(MockDestructor::new()));
        }
    }

    crate::submit_extension!(TestExtension);

    #[test]
    fn should_register_factory_for_all_roles() {
        let loader = StaticServiceLoader::default().with_extension(TestExtension);

        assert_eq!(loader.configurators().len(), 1);
        assert_eq!(loader.instantiators().len(), 1);
        assert_eq!(loader.destructors().len(), 2);
    }

    #[test]
    fn should_discover_submitted_extensions() {
        let loader = StaticServiceLoader::new();

        assert!(loader
            .configurators()
            .iter()
            .any(|configurator| configurator.drone_type() == DroneType::of::<TestDrone>()));
    }
}
