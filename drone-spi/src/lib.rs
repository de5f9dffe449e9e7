//! Service provider interface for drones - browser-automation drivers and similar resources
//! injected into tests. This crate contains the building blocks used by the `drone` framework
//! crate and by modules contributing support for concrete drone types:
//!
//! * [drone_point] - identity of injection points,
//! * [service] - pluggable Configurator/Instantiator/Destructor roles,
//! * [registry] - lookup of the best implementation for a drone type and qualifier,
//! * [context] - per-point runtime state,
//! * [descriptor] - extension configuration,
//! * [extension] - discovery of pluggable implementations,
//! * [injection] - metadata of fields and parameters receiving drones.
//!
//! ### Features
//!
//! * `derive` - `#[derive(DroneInjected)]` for test structs

extern crate self as drone_spi;

pub mod context;
pub mod descriptor;
pub mod drone_point;
pub mod error;
pub mod extension;
pub mod injection;
pub mod registry;
pub mod service;

#[cfg(feature = "derive")]
pub use drone_spi_derive::DroneInjected;
