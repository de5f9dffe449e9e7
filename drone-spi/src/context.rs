//! Drone state is kept in a [DroneContext] - a store mapping each [DronePoint] to its
//! [DronePointContext]. An entry holds the configuration built for the point and, once the drone
//! has been created, the live instance.
//!
//! Entries appear on first access and are only removed explicitly, when the scope of their
//! [Lifecycle] ends. This makes class-scoped drones survive method boundaries, while
//! method-scoped ones are dropped after each method.

use crate::drone_point::{DronePoint, Lifecycle};
use crate::service::{DroneConfigurationAnyPtr, DroneInstanceAnyPtr, DroneInstancePtr};
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::Any;
use std::sync::Arc;

/// Runtime state of a single [DronePoint].
#[derive(Derivative, Clone, Default)]
#[derivative(Debug)]
pub struct DronePointContext {
    #[derivative(Debug = "ignore")]
    configuration: Option<DroneConfigurationAnyPtr>,
    #[derivative(Debug = "ignore")]
    instance: Option<DroneInstanceAnyPtr>,
}

impl DronePointContext {
    #[inline]
    pub fn has_configuration(&self) -> bool {
        self.configuration.is_some()
    }

    #[inline]
    pub fn configuration(&self) -> Option<DroneConfigurationAnyPtr> {
        self.configuration.clone()
    }

    /// Returns the configuration cast to `C`, or `None` if missing or of a different type.
    pub fn configuration_as<C: Any + Send + Sync>(&self) -> Option<Arc<C>> {
        self.configuration
            .clone()
            .and_then(|configuration| configuration.downcast::<C>().ok())
    }

    pub fn set_configuration(&mut self, configuration: DroneConfigurationAnyPtr) {
        self.configuration = Some(configuration);
    }

    #[inline]
    pub fn is_instantiated(&self) -> bool {
        self.instance.is_some()
    }

    #[inline]
    pub fn instance(&self) -> Option<DroneInstanceAnyPtr> {
        self.instance.clone()
    }

    /// Returns the instance cast to `T`, or `None` if missing or of a different type.
    pub fn instance_as<T: Any + Send + Sync>(&self) -> Option<DroneInstancePtr<T>> {
        self.instance
            .clone()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    pub fn set_instance(&mut self, instance: DroneInstanceAnyPtr) {
        self.instance = Some(instance);
    }

    /// Removes the instance, leaving the entry not instantiated.
    pub fn take_instance(&mut self) -> Option<DroneInstanceAnyPtr> {
        self.instance.take()
    }
}

/// Store of [DronePointContext]s. Please see module-level documentation for details.
#[derive(Debug, Default)]
pub struct DroneContext {
    entries: FxHashMap<DronePoint, DronePointContext>,
}

impl DroneContext {
    /// Returns the entry for given point, creating an empty one on first access.
    pub fn get(&mut self, point: &DronePoint) -> &mut DronePointContext {
        self.entries.entry(point.clone()).or_default()
    }

    /// Returns the entry for given point without creating it.
    #[inline]
    pub fn peek(&self, point: &DronePoint) -> Option<&DronePointContext> {
        self.entries.get(point)
    }

    #[inline]
    pub fn contains(&self, point: &DronePoint) -> bool {
        self.entries.contains_key(point)
    }

    pub fn remove(&mut self, point: &DronePoint) -> Option<DronePointContext> {
        self.entries.remove(point)
    }

    /// Points with given lifecycle, in a stable order.
    pub fn points(&self, lifecycle: Lifecycle) -> Vec<DronePoint> {
        self.entries
            .keys()
            .filter(|point| point.lifecycle() == lifecycle)
            .cloned()
            .sorted_by_key(|point| point.to_string())
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
