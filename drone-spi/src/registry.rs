//! Registry of pluggable [Configurator](crate::service::Configurator),
//! [Instantiator](crate::service::Instantiator) and [Destructor](crate::service::Destructor)
//! implementations. The registry is populated once per suite and is read-only afterwards, therefore
//! it's safe to share it between concurrently running test classes.
//!
//! ## Resolution
//!
//! Multiple implementations can be registered for a single drone type. When requesting an
//! implementation for a given type and qualifier, only compatible ones are considered - those
//! registered for the same drone type, which are either unrestricted or restricted to the
//! requested qualifier. Among them:
//!
//! 1. an implementation restricted to the requested qualifier wins over an unrestricted one,
//! 2. higher [precedence](crate::service::Configurator::precedence) wins,
//! 3. the most recently registered one wins.

use crate::drone_point::{DroneType, Qualifier};
use crate::error::DroneRegistryError;
use crate::service::{ConfiguratorPtr, DestructorPtr, DroneRole, InstantiatorPtr};
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::TypeId;
use tracing::debug;

#[derive(Derivative, Clone)]
#[derivative(Debug(bound = ""))]
struct Registration<T> {
    qualifier: Option<Qualifier>,
    precedence: i8,
    #[derivative(Debug = "ignore")]
    implementation: T,
}

impl<T> Registration<T> {
    // higher is better; None when incompatible
    fn specificity(&self, qualifier: Option<&Qualifier>) -> Option<(bool, i8)> {
        match (&self.qualifier, qualifier) {
            (None, _) => Some((false, self.precedence)),
            (Some(own), Some(requested)) if own == requested => Some((true, self.precedence)),
            _ => None,
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug(bound = ""))]
struct RoleMap<T> {
    registrations: FxHashMap<TypeId, Vec<Registration<T>>>,
}

impl<T> Default for RoleMap<T> {
    fn default() -> Self {
        Self {
            registrations: Default::default(),
        }
    }
}

impl<T: Clone> RoleMap<T> {
    fn register(&mut self, drone_type: DroneType, registration: Registration<T>) {
        self.registrations
            .entry(drone_type.id())
            .or_default()
            .push(registration);
    }

    fn resolve(&self, drone_type: DroneType, qualifier: Option<&Qualifier>) -> Option<T> {
        self.registrations.get(&drone_type.id()).and_then(|registrations| {
            registrations
                .iter()
                .enumerate()
                .filter_map(|(index, registration)| {
                    registration
                        .specificity(qualifier)
                        .map(|(qualified, precedence)| ((qualified, precedence, index), registration))
                })
                .max_by_key(|(key, _)| *key)
                .map(|(_, registration)| registration.implementation.clone())
        })
    }

    fn is_registered(&self, drone_type: DroneType) -> bool {
        self.registrations
            .get(&drone_type.id())
            .map(|registrations| !registrations.is_empty())
            .unwrap_or(false)
    }
}

/// Implementation chosen for a single role.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum DroneRegistryEntry {
    Configurator(#[derivative(Debug = "ignore")] ConfiguratorPtr),
    Instantiator(#[derivative(Debug = "ignore")] InstantiatorPtr),
    Destructor(#[derivative(Debug = "ignore")] DestructorPtr),
}

impl DroneRegistryEntry {
    pub fn role(&self) -> DroneRole {
        match self {
            DroneRegistryEntry::Configurator(_) => DroneRole::Configurator,
            DroneRegistryEntry::Instantiator(_) => DroneRole::Instantiator,
            DroneRegistryEntry::Destructor(_) => DroneRole::Destructor,
        }
    }

    pub fn drone_type(&self) -> DroneType {
        match self {
            DroneRegistryEntry::Configurator(configurator) => configurator.drone_type(),
            DroneRegistryEntry::Instantiator(instantiator) => instantiator.drone_type(),
            DroneRegistryEntry::Destructor(destructor) => destructor.drone_type(),
        }
    }
}

/// Lookup table from drone type and qualifier to the best matching implementations. Please see
/// the module-level documentation for resolution rules.
#[derive(Clone, Debug, Default)]
pub struct DroneRegistry {
    configurators: RoleMap<ConfiguratorPtr>,
    instantiators: RoleMap<InstantiatorPtr>,
    destructors: RoleMap<DestructorPtr>,
    names: FxHashMap<TypeId, &'static str>,
}

impl DroneRegistry {
    pub fn register_configurator(&mut self, configurator: ConfiguratorPtr) {
        let drone_type = configurator.drone_type();
        debug!("Registering Configurator for {}.", drone_type);

        self.names.insert(drone_type.id(), drone_type.name());
        self.configurators.register(
            drone_type,
            Registration {
                qualifier: configurator.qualifier(),
                precedence: configurator.precedence(),
                implementation: configurator,
            },
        );
    }

    pub fn register_instantiator(&mut self, instantiator: InstantiatorPtr) {
        let drone_type = instantiator.drone_type();
        debug!("Registering Instantiator for {}.", drone_type);

        self.names.insert(drone_type.id(), drone_type.name());
        self.instantiators.register(
            drone_type,
            Registration {
                qualifier: instantiator.qualifier(),
                precedence: instantiator.precedence(),
                implementation: instantiator,
            },
        );
    }

    pub fn register_destructor(&mut self, destructor: DestructorPtr) {
        let drone_type = destructor.drone_type();
        debug!("Registering Destructor for {}.", drone_type);

        self.names.insert(drone_type.id(), drone_type.name());
        self.destructors.register(
            drone_type,
            Registration {
                qualifier: destructor.qualifier(),
                precedence: destructor.precedence(),
                implementation: destructor,
            },
        );
    }

    /// Registers all three roles at once.
    pub fn register(
        &mut self,
        configurator: ConfiguratorPtr,
        instantiator: InstantiatorPtr,
        destructor: DestructorPtr,
    ) {
        self.register_configurator(configurator);
        self.register_instantiator(instantiator);
        self.register_destructor(destructor);
    }

    pub fn configurator_for(
        &self,
        drone_type: DroneType,
        qualifier: Option<&Qualifier>,
    ) -> Result<ConfiguratorPtr, DroneRegistryError> {
        self.configurators
            .resolve(drone_type, qualifier)
            .ok_or_else(|| unregistered(DroneRole::Configurator, drone_type, qualifier))
    }

    pub fn instantiator_for(
        &self,
        drone_type: DroneType,
        qualifier: Option<&Qualifier>,
    ) -> Result<InstantiatorPtr, DroneRegistryError> {
        self.instantiators
            .resolve(drone_type, qualifier)
            .ok_or_else(|| unregistered(DroneRole::Instantiator, drone_type, qualifier))
    }

    pub fn destructor_for(
        &self,
        drone_type: DroneType,
        qualifier: Option<&Qualifier>,
    ) -> Result<DestructorPtr, DroneRegistryError> {
        self.destructors
            .resolve(drone_type, qualifier)
            .ok_or_else(|| unregistered(DroneRole::Destructor, drone_type, qualifier))
    }

    /// Returns the implementation serving unqualified points of given type in given role.
    pub fn entry_for(
        &self,
        drone_type: DroneType,
        role: DroneRole,
    ) -> Result<DroneRegistryEntry, DroneRegistryError> {
        match role {
            DroneRole::Configurator => self
                .configurator_for(drone_type, None)
                .map(DroneRegistryEntry::Configurator),
            DroneRole::Instantiator => self
                .instantiator_for(drone_type, None)
                .map(DroneRegistryEntry::Instantiator),
            DroneRole::Destructor => self
                .destructor_for(drone_type, None)
                .map(DroneRegistryEntry::Destructor),
        }
    }

    /// Checks if given role is available for a drone type, regardless of qualifiers.
    pub fn is_registered(&self, drone_type: DroneType, role: DroneRole) -> bool {
        match role {
            DroneRole::Configurator => self.configurators.is_registered(drone_type),
            DroneRole::Instantiator => self.instantiators.is_registered(drone_type),
            DroneRole::Destructor => self.destructors.is_registered(drone_type),
        }
    }

    /// Names of all drone types with at least one registered implementation.
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.names.values().copied().sorted().collect()
    }
}

fn unregistered(
    role: DroneRole,
    drone_type: DroneType,
    qualifier: Option<&Qualifier>,
) -> DroneRegistryError {
    DroneRegistryError::UnregisteredDrone {
        role,
        drone_type: drone_type.name(),
        qualifier: qualifier.map(|qualifier| qualifier.name().to_string()),
    }
}
