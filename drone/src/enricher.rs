//! Injection of drones into tests. Class-scoped drones are injected into fields of
//! [DroneInjected] test structs, while method-scoped drones are resolved as method parameters.
//! Drones are created on first use and reused until their scope ends.

use crate::configurator::configure;
use crate::runtime::{lookup_qualifier, DroneState};
use drone_spi::drone_point::DronePoint;
use drone_spi::error::{DroneError, IllegalStateError};
use drone_spi::injection::{DroneInjected, InjectionError, TestMethod};
use drone_spi::service::DroneInstanceAnyPtr;
use tracing::debug;

/// Injects drones into test instances and method parameters.
pub trait TestEnricher {
    /// Injects class-scoped drones into all drone fields of given instance.
    fn enrich(&mut self, instance: &mut dyn DroneInjected) -> Result<(), DroneError>;

    /// Resolves method-scoped drones for given method. Returns a value for each parameter, with
    /// `None` for parameters not managed by drones.
    fn resolve(
        &mut self,
        method: &TestMethod,
    ) -> Result<Vec<Option<DroneInstanceAnyPtr>>, DroneError>;
}

/// Default enrichment logic operating on [DroneState].
#[derive(Default, Debug)]
pub struct DroneTestEnricher;

impl DroneTestEnricher {
    /// Returns the live instance for given point, configuring and instantiating it if needed.
    pub fn instantiate(
        state: &mut DroneState,
        point: &DronePoint,
    ) -> Result<DroneInstanceAnyPtr, DroneError> {
        if let Some(instance) = state
            .context()?
            .peek(point)
            .and_then(|context| context.instance())
        {
            return Ok(instance);
        }

        let configuration = configure(state, point)?;
        let instantiator = state
            .registry()?
            .instantiator_for(point.drone_type(), lookup_qualifier(point)?)?;

        debug!("Instantiating {}.", point);

        let instance = instantiator
            .create_instance(configuration)
            .map_err(|source| DroneError::Instantiation {
                point: point.clone(),
                source,
            })?;

        state
            .context_mut()?
            .get(point)
            .set_instance(instance.clone());

        Ok(instance)
    }

    pub fn enrich_with(
        &self,
        state: &mut DroneState,
        instance: &mut dyn DroneInjected,
    ) -> Result<(), DroneError> {
        let class = instance.drone_test_class();

        for field in class.fields() {
            let point = field.drone_point();
            let drone = Self::instantiate(state, point)?;

            debug!("Injecting {} into {}::{}.", point, class.name(), field.name());

            instance
                .inject(field.name(), drone)
                .map_err(|error| match error {
                    InjectionError::IncompatibleInstance(_) => {
                        DroneError::from(IllegalStateError::IncompatibleInstance(
                            point.clone(),
                            point.drone_type().name(),
                        ))
                    }
                    InjectionError::UnknownField(field) => DroneError::Injection {
                        class: class.name().to_string(),
                        field,
                    },
                })?;
        }

        Ok(())
    }

    pub fn resolve_with(
        &self,
        state: &mut DroneState,
        method: &TestMethod,
    ) -> Result<Vec<Option<DroneInstanceAnyPtr>>, DroneError> {
        method
            .parameters()
            .iter()
            .map(|parameter| {
                parameter
                    .as_ref()
                    .map(|parameter| Self::instantiate(state, parameter.drone_point()))
                    .transpose()
            })
            .collect()
    }
}
