use crate::drone_point::DronePoint;
use crate::service::DroneRole;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

/// Type-erased error produced by pluggable drone implementations.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Errors related to looking up pluggable implementations in a
/// [DroneRegistry](crate::registry::DroneRegistry).
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum DroneRegistryError {
    #[error("No {role} registered for drone type '{drone_type}' with qualifier {qualifier:?}")]
    UnregisteredDrone {
        role: DroneRole,
        drone_type: &'static str,
        qualifier: Option<String>,
    },
}

/// Errors signalling the drone machinery was used in a way which cannot be recovered from.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum IllegalStateError {
    #[error(transparent)]
    UnregisteredDrone(#[from] DroneRegistryError),
    #[error("Drone suite is not active - BeforeSuite was not fired or AfterSuite already happened")]
    SuiteNotStarted,
    #[error("Drone suite is already active - AfterSuite was not fired for the previous suite")]
    SuiteAlreadyStarted,
    #[error("Cannot determine configuration qualifier for {0} - multiple qualifiers present")]
    AmbiguousQualifier(DronePoint),
    #[error("Stored drone for {0} is not compatible with the requested type: {1}")]
    IncompatibleInstance(DronePoint, &'static str),
}

/// Errors related to the descriptor holding extension configuration.
#[derive(Error, Clone, Debug)]
pub enum DescriptorError {
    #[error("Error loading descriptor: {0}")]
    Load(Arc<config::ConfigError>),
    #[error("Error mapping extension '{extension}' to configuration: {source}")]
    Mapping {
        extension: String,
        source: Arc<config::ConfigError>,
    },
}

/// Top-level error for creating, injecting and destroying drones.
#[derive(Error, Clone, Debug)]
pub enum DroneError {
    #[error("Illegal state: {0}")]
    IllegalState(#[from] IllegalStateError),
    #[error("Error configuring {point}: {source}")]
    Configuration { point: DronePoint, source: ErrorPtr },
    #[error("Error instantiating {point}: {source}")]
    Instantiation { point: DronePoint, source: ErrorPtr },
    #[error("Error destroying {point}: {source}")]
    Destruction { point: DronePoint, source: ErrorPtr },
    #[error("Cannot inject drone into field '{field}' of {class}")]
    Injection { class: String, field: String },
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("Error loading drone config: {0}")]
    Config(Arc<config::ConfigError>),
}

impl From<DroneRegistryError> for DroneError {
    fn from(error: DroneRegistryError) -> Self {
        DroneError::IllegalState(error.into())
    }
}

impl DroneError {
    /// Checks if this error is caused by an illegal state, rather than a failing implementation.
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, DroneError::IllegalState(_))
    }
}
