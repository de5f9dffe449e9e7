#![allow(dead_code)]

use drone_spi::descriptor::ArquillianDescriptor;
use drone_spi::drone_point::{DronePoint, DroneType, Lifecycle};
use drone_spi::error::ErrorPtr;
use drone_spi::extension::{ExtensionBuilder, LoadableExtension, StaticServiceLoader};
use drone_spi::service::{
    downcast_configuration, downcast_instance, Configurator, Destructor,
    DroneConfigurationAnyPtr, DroneInstanceAnyPtr, Instantiator,
};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

pub const CONFIGURATION_NAME: &str = "mockdrone";
pub const DIFFERENT_FIELD: &str = "ArquillianDescriptor @DifferentMock";
pub const METHOD_ARGUMENT_ONE_FIELD: &str = "ArquillianDescriptor @MethodArgumentOne";

#[derive(Debug)]
pub struct MockDrone {
    field: String,
    lifecycle: Lifecycle,
}

impl MockDrone {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct MockDroneConfiguration {
    pub field: String,
    #[serde(skip)]
    pub lifecycle: Option<Lifecycle>,
}

/// Log of destroyed drones, in destruction order.
pub type DestroyedDrones = Arc<Mutex<Vec<(Lifecycle, String)>>>;

#[derive(Clone, Default)]
pub struct MockDroneFactory {
    destroyed: DestroyedDrones,
}

impl MockDroneFactory {
    pub fn destroyed(&self) -> DestroyedDrones {
        self.destroyed.clone()
    }
}

impl Configurator for MockDroneFactory {
    fn drone_type(&self) -> DroneType {
        DroneType::of::<MockDrone>()
    }

    fn create_configuration(
        &self,
        descriptor: &ArquillianDescriptor,
        point: &DronePoint,
    ) -> Result<DroneConfigurationAnyPtr, ErrorPtr> {
        let mut configuration = descriptor
            .map_configuration::<MockDroneConfiguration>(
                CONFIGURATION_NAME,
                point.qualifiers().iter().next(),
            )
            .map_err(|error| Arc::new(error) as ErrorPtr)?;
        configuration.lifecycle = Some(point.lifecycle());

        Ok(Arc::new(configuration))
    }
}

impl Instantiator for MockDroneFactory {
    fn drone_type(&self) -> DroneType {
        DroneType::of::<MockDrone>()
    }

    fn create_instance(
        &self,
        configuration: DroneConfigurationAnyPtr,
    ) -> Result<DroneInstanceAnyPtr, ErrorPtr> {
        let configuration = downcast_configuration::<MockDroneConfiguration>(configuration)?;

        Ok(Arc::new(MockDrone {
            field: configuration.field.clone(),
            lifecycle: configuration.lifecycle.unwrap_or(Lifecycle::Method),
        }))
    }
}

impl Destructor for MockDroneFactory {
    fn drone_type(&self) -> DroneType {
        DroneType::of::<MockDrone>()
    }

    fn destroy_instance(&self, instance: DroneInstanceAnyPtr) -> Result<(), ErrorPtr> {
        let instance = downcast_instance::<MockDrone>(instance)?;
        if let Ok(mut destroyed) = self.destroyed.lock() {
            destroyed.push((instance.lifecycle(), instance.field().to_string()));
        }

        Ok(())
    }
}

pub struct MockDroneExtension {
    factory: MockDroneFactory,
}

impl LoadableExtension for MockDroneExtension {
    fn register(&self, builder: &mut ExtensionBuilder) {
        builder.factory(self.factory.clone());
    }
}

/// Creates a service loader providing [MockDroneFactory] and the log of drones it destroyed.
pub fn create_service_loader() -> (StaticServiceLoader, DestroyedDrones) {
    let factory = MockDroneFactory::default();
    let destroyed = factory.destroyed();

    (
        StaticServiceLoader::default().with_extension(MockDroneExtension { factory }),
        destroyed,
    )
}

pub fn create_descriptor() -> ArquillianDescriptor {
    ArquillianDescriptor::default()
        .with_property("mockdrone-different", "field", DIFFERENT_FIELD)
        .with_property(
            "mockdrone-methodargumentone",
            "field",
            METHOD_ARGUMENT_ONE_FIELD,
        )
}
