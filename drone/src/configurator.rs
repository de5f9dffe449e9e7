//! Configuration of drone points. Points declared by a test class are configured on `BeforeClass`,
//! while ones declared by a test method on `Before`. Points not activated this way, e.g. for test
//! classes running outside of the lifecycle, are configured lazily during enrichment.

use crate::event::TestLifecycleEvent;
use crate::runtime::{lookup_qualifier, DroneState, LifecycleObserver};
use drone_spi::drone_point::DronePoint;
use drone_spi::error::{DroneError, IllegalStateError};
use drone_spi::injection::InjectionPoint;
use drone_spi::service::DroneConfigurationAnyPtr;
use tracing::{debug, warn};

/// Returns configuration for given point, creating it with the best matching
/// [Configurator](drone_spi::service::Configurator) if missing. Existing configuration is never
/// recreated.
pub fn configure(
    state: &mut DroneState,
    point: &DronePoint,
) -> Result<DroneConfigurationAnyPtr, DroneError> {
    let qualifier = lookup_qualifier(point)?;

    if let Some(configuration) = state.context_mut()?.get(point).configuration() {
        return Ok(configuration);
    }

    let configurator = state
        .registry()?
        .configurator_for(point.drone_type(), qualifier)?;

    debug!("Configuring {}.", point);

    let configuration = configurator
        .create_configuration(state.descriptor(), point)
        .map_err(|source| DroneError::Configuration {
            point: point.clone(),
            source,
        })?;

    state
        .context_mut()?
        .get(point)
        .set_configuration(configuration.clone());

    Ok(configuration)
}

/// Configures points of test classes and methods when they get activated.
#[derive(Default, Debug)]
pub struct DroneConfigurator;

impl DroneConfigurator {
    fn configure_points<'a, I: Iterator<Item = &'a InjectionPoint>>(
        state: &mut DroneState,
        points: I,
    ) -> Result<(), DroneError> {
        for point in points.map(InjectionPoint::drone_point) {
            match configure(state, point) {
                Ok(_) => {}
                Err(DroneError::IllegalState(IllegalStateError::UnregisteredDrone(error))) => {
                    warn!("Skipping configuration of {}: {}", point, error);
                }
                Err(error) => return Err(error),
            }
        }

        Ok(())
    }
}

impl LifecycleObserver for DroneConfigurator {
    fn on_event(
        &self,
        event: &TestLifecycleEvent,
        state: &mut DroneState,
    ) -> Result<(), DroneError> {
        match event {
            TestLifecycleEvent::BeforeClass(class) => {
                Self::configure_points(state, class.fields().iter())
            }
            TestLifecycleEvent::Before(method) => {
                Self::configure_points(state, method.drone_parameters())
            }
            _ => Ok(()),
        }
    }
}
