//! Lifecycle management and injection of browser-automation drivers ("drones") into tests, based
//! on the [drone_spi] service provider interface.
//!
//! Tests declare which drones they need, either as fields of a test struct deriving
//! [DroneInjected](drone_spi::DroneInjected), or as parameters of a test method described by a
//! [TestMethod](drone_spi::injection::TestMethod). Each declaration is identified by a
//! [DronePoint](drone_spi::drone_point::DronePoint): the drone type, the scope it lives in and
//! optional qualifiers. The host test runner drives a [DroneRuntime](runtime::DroneRuntime) by
//! firing [TestLifecycleEvent](event::TestLifecycleEvent)s and asks it to enrich test instances
//! and resolve method parameters. The runtime then:
//!
//! 1. registers all pluggable implementations on `BeforeSuite`,
//! 2. configures declared drones on `BeforeClass` and `Before`,
//! 3. creates drones lazily on first injection,
//! 4. destroys drones when their scope ends.
//!
//! ```
//! use drone::event::TestLifecycleEvent;
//! use drone::runtime::DroneRuntimeBuilder;
//!
//! let mut runtime = DroneRuntimeBuilder::new().build();
//! runtime.fire(TestLifecycleEvent::BeforeSuite).unwrap();
//! assert!(runtime.context().is_some());
//! runtime.fire(TestLifecycleEvent::AfterSuite).unwrap();
//! assert!(runtime.context().is_none());
//! ```

pub mod config;
pub mod configurator;
pub mod destructor;
pub mod enricher;
pub mod event;
pub mod lifecycle;
pub mod logging;
#[cfg(test)]
mod mocks;
pub mod runtime;
