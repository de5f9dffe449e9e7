//! Metadata describing where drones should be injected. Class-scoped drones are injected into
//! fields of a test struct implementing [DroneInjected], while method-scoped ones are passed as
//! parameters described by a [TestMethod].
//!
//! With the `derive` feature, [DroneInjected] can be derived for structs with `#[drone]` fields:
//!
//! ```
//! use drone_spi::injection::DroneInjected;
//! use drone_spi::service::DroneInstancePtr;
//! use drone_spi::DroneInjected;
//!
//! struct Browser;
//!
//! #[derive(DroneInjected, Default)]
//! struct LoginTest {
//!     #[drone]
//!     browser: Option<DroneInstancePtr<Browser>>,
//!     #[drone(qualifier = "Admin")]
//!     admin_browser: Option<DroneInstancePtr<Browser>>,
//!     // not a drone
//!     user: String,
//! }
//!
//! assert_eq!(LoginTest::test_class().fields().len(), 2);
//! ```

use crate::drone_point::{DronePoint, DroneType, Lifecycle, Qualifier};
use crate::service::{DroneInstanceAnyPtr, DroneInstancePtr};
use std::any::Any;
use thiserror::Error;

/// A single field or parameter receiving a drone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InjectionPoint {
    name: String,
    point: DronePoint,
}

impl InjectionPoint {
    /// Creates a point for a class-scoped field.
    pub fn field<T: Any + Send + Sync, I: IntoIterator<Item = Qualifier>>(
        name: &str,
        qualifiers: I,
    ) -> Self {
        Self {
            name: name.to_string(),
            point: DronePoint::new(DroneType::of::<T>(), Lifecycle::Class, qualifiers),
        }
    }

    /// Creates a point for a method-scoped parameter.
    pub fn parameter<T: Any + Send + Sync, I: IntoIterator<Item = Qualifier>>(
        name: &str,
        qualifiers: I,
    ) -> Self {
        Self {
            name: name.to_string(),
            point: DronePoint::new(DroneType::of::<T>(), Lifecycle::Method, qualifiers),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn drone_point(&self) -> &DronePoint {
        &self.point
    }
}

/// Class-level injection metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestClass {
    name: String,
    fields: Vec<InjectionPoint>,
}

impl TestClass {
    pub fn new<T: Into<String>>(name: T, fields: Vec<InjectionPoint>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn fields(&self) -> &[InjectionPoint] {
        &self.fields
    }
}

/// Method-level injection metadata. Each parameter is either a drone [InjectionPoint] or `None`
/// for parameters resolved by something else.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestMethod {
    class: String,
    name: String,
    parameters: Vec<Option<InjectionPoint>>,
}

impl TestMethod {
    pub fn new<C: Into<String>, N: Into<String>>(class: C, name: N) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            parameters: vec![],
        }
    }

    /// Adds a drone parameter.
    pub fn with_drone<T: Any + Send + Sync, I: IntoIterator<Item = Qualifier>>(
        mut self,
        name: &str,
        qualifiers: I,
    ) -> Self {
        self.parameters
            .push(Some(InjectionPoint::parameter::<T, I>(name, qualifiers)));
        self
    }

    /// Adds a parameter not managed by drones.
    pub fn with_other_parameter(mut self) -> Self {
        self.parameters.push(None);
        self
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parameters(&self) -> &[Option<InjectionPoint>] {
        &self.parameters
    }

    pub fn drone_parameters(&self) -> impl Iterator<Item = &InjectionPoint> {
        self.parameters.iter().flatten()
    }
}

/// Error returned when an instance cannot be injected into a field.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum InjectionError {
    #[error("Unknown drone field: {0}")]
    UnknownField(String),
    #[error("Drone instance is incompatible with field: {0}")]
    IncompatibleInstance(String),
}

/// Field types able to hold an injected drone. Used by the derive macro to find out the drone
/// type of a field and to assign type-erased instances.
pub trait DroneSlot {
    type Drone: Any + Send + Sync;

    fn fill(&mut self, field: &str, instance: DroneInstanceAnyPtr) -> Result<(), InjectionError>;
}

impl<T: Any + Send + Sync> DroneSlot for Option<DroneInstancePtr<T>> {
    type Drone = T;

    fn fill(&mut self, field: &str, instance: DroneInstanceAnyPtr) -> Result<(), InjectionError> {
        let instance = instance
            .downcast::<T>()
            .map_err(|_| InjectionError::IncompatibleInstance(field.to_string()))?;

        *self = Some(instance);
        Ok(())
    }
}

/// Test structs receiving class-scoped drones in their fields.
pub trait DroneInjected {
    /// Returns metadata with all drone fields.
    fn test_class() -> TestClass
    where
        Self: Sized;

    /// Returns metadata for this instance. Object-safe version of [Self::test_class].
    fn drone_test_class(&self) -> TestClass;

    /// Assigns the instance to given field.
    fn inject(&mut self, field: &str, instance: DroneInstanceAnyPtr)
        -> Result<(), InjectionError>;
}
