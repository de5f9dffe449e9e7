//! Pluggable roles taking part in a drone's life. Each drone type is served by a
//! [Configurator] building its configuration, an [Instantiator] creating live instances from that
//! configuration and a [Destructor] releasing them. Typically, a single factory type implements
//! all three roles and gets registered via
//! [ExtensionBuilder::factory](crate::extension::ExtensionBuilder::factory).
//!
//! Configurations and instances are passed around type-erased. Implementations should use
//! [downcast_configuration] to get their concrete configuration back.

use crate::descriptor::ArquillianDescriptor;
use crate::drone_point::{DronePoint, DroneType, Qualifier};
use crate::error::ErrorPtr;
#[cfg(test)]
use mockall::automock;
use std::any::{type_name, Any};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Shared pointer to a typed drone instance.
pub type DroneInstancePtr<T> = Arc<T>;

/// Type-erased drone instance.
pub type DroneInstanceAnyPtr = Arc<dyn Any + Send + Sync>;

/// Type-erased drone configuration.
pub type DroneConfigurationAnyPtr = Arc<dyn Any + Send + Sync>;

pub type ConfiguratorPtr = Arc<dyn Configurator + Send + Sync>;
pub type InstantiatorPtr = Arc<dyn Instantiator + Send + Sync>;
pub type DestructorPtr = Arc<dyn Destructor + Send + Sync>;

/// Role of a pluggable implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum DroneRole {
    Configurator,
    Instantiator,
    Destructor,
}

impl Display for DroneRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DroneRole::Configurator => f.write_str("Configurator"),
            DroneRole::Instantiator => f.write_str("Instantiator"),
            DroneRole::Destructor => f.write_str("Destructor"),
        }
    }
}

/// Builds configuration objects for a given drone type.
#[cfg_attr(test, automock)]
pub trait Configurator {
    /// Drone type this implementation serves.
    fn drone_type(&self) -> DroneType;

    /// Restricts this implementation to points carrying given qualifier. `None` serves any point.
    fn qualifier(&self) -> Option<Qualifier> {
        None
    }

    /// Higher precedence wins when multiple implementations are compatible. Default 0.
    fn precedence(&self) -> i8 {
        0
    }

    /// Creates configuration for the given point, usually by reading the descriptor sections
    /// returned by [ArquillianDescriptor::properties_for].
    fn create_configuration(
        &self,
        descriptor: &ArquillianDescriptor,
        point: &DronePoint,
    ) -> Result<DroneConfigurationAnyPtr, ErrorPtr>;
}

/// Creates live drone instances.
#[cfg_attr(test, automock)]
pub trait Instantiator {
    fn drone_type(&self) -> DroneType;

    fn qualifier(&self) -> Option<Qualifier> {
        None
    }

    fn precedence(&self) -> i8 {
        0
    }

    /// Creates a new instance using configuration created by the matching [Configurator].
    fn create_instance(
        &self,
        configuration: DroneConfigurationAnyPtr,
    ) -> Result<DroneInstanceAnyPtr, ErrorPtr>;
}

/// Releases live drone instances.
#[cfg_attr(test, automock)]
pub trait Destructor {
    fn drone_type(&self) -> DroneType;

    fn qualifier(&self) -> Option<Qualifier> {
        None
    }

    fn precedence(&self) -> i8 {
        0
    }

    fn destroy_instance(&self, instance: DroneInstanceAnyPtr) -> Result<(), ErrorPtr>;
}

/// Error returned when a type-erased value has an unexpected type.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("Expected value of type {expected}")]
pub struct IncompatibleTypeError {
    pub expected: &'static str,
}

/// Casts type-erased configuration back to its concrete type.
pub fn downcast_configuration<C: Any + Send + Sync>(
    configuration: DroneConfigurationAnyPtr,
) -> Result<Arc<C>, ErrorPtr> {
    configuration.downcast::<C>().map_err(|_| {
        Arc::new(IncompatibleTypeError {
            expected: type_name::<C>(),
        }) as ErrorPtr
    })
}

/// Casts a type-erased drone instance back to its concrete type.
pub fn downcast_instance<T: Any + Send + Sync>(
    instance: DroneInstanceAnyPtr,
) -> Result<DroneInstancePtr<T>, ErrorPtr> {
    instance.downcast::<T>().map_err(|_| {
        Arc::new(IncompatibleTypeError {
            expected: type_name::<T>(),
        }) as ErrorPtr
    })
}

#[cfg(test)]
mod tests {
    use crate::service::{downcast_configuration, downcast_instance, DroneConfigurationAnyPtr};
    use std::sync::Arc;

    #[test]
    fn should_downcast_compatible_values() {
        let configuration = Arc::new(5u8) as DroneConfigurationAnyPtr;
        assert_eq!(*downcast_configuration::<u8>(configuration.clone()).unwrap(), 5);
        assert_eq!(*downcast_instance::<u8>(configuration).unwrap(), 5);
    }

    #[test]
    fn should_reject_incompatible_values() {
        let configuration = Arc::new(5u8) as DroneConfigurationAnyPtr;
        let error = downcast_configuration::<String>(configuration).unwrap_err();
        assert!(error.to_string().contains("String"));
    }
}
