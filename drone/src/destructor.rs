//! Destruction of drones when their scope ends. Method-scoped drones are destroyed on `After`,
//! class-scoped ones on `AfterClass`, and anything left over on `AfterSuite`.

use crate::event::TestLifecycleEvent;
use crate::runtime::{lookup_qualifier, DroneState, LifecycleObserver};
use drone_spi::drone_point::{DronePoint, Lifecycle};
use drone_spi::error::DroneError;
use drone_spi::registry::DroneRegistry;
use drone_spi::service::DroneInstanceAnyPtr;
use tracing::{debug, error};

/// Destroys instantiated drones and removes context entries of finished scopes. Failing
/// destructors are logged and don't stop the teardown.
#[derive(Default, Debug)]
pub struct DroneDestructor;

impl DroneDestructor {
    fn destroy_instance(
        registry: &DroneRegistry,
        point: &DronePoint,
        instance: DroneInstanceAnyPtr,
    ) -> Result<(), DroneError> {
        let destructor = registry.destructor_for(point.drone_type(), lookup_qualifier(point)?)?;

        debug!("Destroying {}.", point);

        destructor
            .destroy_instance(instance)
            .map_err(|source| DroneError::Destruction {
                point: point.clone(),
                source,
            })
    }

    /// Destroys all drones with given lifecycle and removes their context entries.
    pub fn destroy(state: &mut DroneState, lifecycle: Lifecycle) -> Result<(), DroneError> {
        let registry = state.registry()?;
        let context = state.context_mut()?;

        for point in context.points(lifecycle) {
            if let Some(instance) = context.get(&point).take_instance() {
                if let Err(error) = Self::destroy_instance(&registry, &point, instance) {
                    error!("{}", error);
                }
            }

            context.remove(&point);
        }

        Ok(())
    }
}

impl LifecycleObserver for DroneDestructor {
    fn on_event(
        &self,
        event: &TestLifecycleEvent,
        state: &mut DroneState,
    ) -> Result<(), DroneError> {
        match event {
            TestLifecycleEvent::After(_) => Self::destroy(state, Lifecycle::Method),
            TestLifecycleEvent::AfterClass(_) => Self::destroy(state, Lifecycle::Class),
            TestLifecycleEvent::AfterSuite => {
                Self::destroy(state, Lifecycle::Method)?;
                Self::destroy(state, Lifecycle::Class)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::destructor::DroneDestructor;
    use crate::event::TestLifecycleEvent;
    use crate::lifecycle::DroneLifecycleManager;
    use crate::mocks::{MockDestructor, MockServiceLoader};
    use crate::runtime::{DroneState, LifecycleObserver, ServiceLoaderPtr};
    use drone_spi::descriptor::ArquillianDescriptor;
    use drone_spi::drone_point::{DronePoint, DroneType, Lifecycle, Qualifier};
    use drone_spi::error::ErrorPtr;
    use drone_spi::injection::{TestClass, TestMethod};
    use drone_spi::registry::DroneRegistry;
    use drone_spi::service::{DestructorPtr, DroneInstanceAnyPtr};
    use std::fmt::Error as FmtError;
    use std::sync::Arc;

    struct TestDrone;

    fn create_state(destructor: MockDestructor) -> DroneState {
        let mut state = DroneState::new(
            Arc::new(MockServiceLoader::new()) as ServiceLoaderPtr,
            ArquillianDescriptor::default(),
        );
        DroneLifecycleManager
            .on_event(&TestLifecycleEvent::BeforeSuite, &mut state)
            .unwrap();

        let mut registry = DroneRegistry::default();
        registry.register_destructor(Arc::new(destructor) as DestructorPtr);
        state.registry = Some(Arc::new(registry));

        state
    }

    fn create_destructor(calls: usize, fail: bool) -> MockDestructor {
        let mut destructor = MockDestructor::new();
        destructor
            .expect_drone_type()
            .return_const(DroneType::of::<TestDrone>());
        destructor
            .expect_qualifier()
            .return_const(None::<Qualifier>);
        destructor.expect_precedence().return_const(0i8);
        destructor
            .expect_destroy_instance()
            .times(calls)
            .returning(move |_| {
                if fail {
                    Err(Arc::new(FmtError) as ErrorPtr)
                } else {
                    Ok(())
                }
            });
        destructor
    }

    fn instantiate(state: &mut DroneState, lifecycle: Lifecycle) -> DronePoint {
        let point = DronePoint::unqualified(DroneType::of::<TestDrone>(), lifecycle);
        state
            .context_mut()
            .unwrap()
            .get(&point)
            .set_instance(Arc::new(TestDrone) as DroneInstanceAnyPtr);
        point
    }

    #[test]
    fn should_destroy_method_drones_after_method() {
        let mut state = create_state(create_destructor(1, false));
        let method_point = instantiate(&mut state, Lifecycle::Method);
        let class_point = instantiate(&mut state, Lifecycle::Class);

        DroneDestructor
            .on_event(
                &TestLifecycleEvent::After(TestMethod::new("Test", "method")),
                &mut state,
            )
            .unwrap();

        let context = state.context().unwrap();
        assert!(!context.contains(&method_point));
        assert!(context.peek(&class_point).unwrap().is_instantiated());
    }

    #[test]
    fn should_destroy_class_drones_after_class() {
        let mut state = create_state(create_destructor(1, false));
        let class_point = instantiate(&mut state, Lifecycle::Class);

        DroneDestructor
            .on_event(
                &TestLifecycleEvent::AfterClass(TestClass::new("Test", vec![])),
                &mut state,
            )
            .unwrap();

        assert!(!state.context().unwrap().contains(&class_point));
    }

    #[test]
    fn should_destroy_remaining_drones_after_suite() {
        let mut state = create_state(create_destructor(2, false));
        instantiate(&mut state, Lifecycle::Method);
        instantiate(&mut state, Lifecycle::Class);

        DroneDestructor
            .on_event(&TestLifecycleEvent::AfterSuite, &mut state)
            .unwrap();

        assert!(state.context().unwrap().is_empty());
    }

    #[test]
    fn should_continue_after_destructor_error() {
        let mut state = create_state(create_destructor(1, true));
        let point = instantiate(&mut state, Lifecycle::Method);

        DroneDestructor::destroy(&mut state, Lifecycle::Method).unwrap();

        assert!(!state.context().unwrap().contains(&point));
    }

    #[test]
    fn should_skip_not_instantiated_drones() {
        let mut state = create_state(create_destructor(0, false));
        let point = DronePoint::unqualified(DroneType::of::<TestDrone>(), Lifecycle::Method);
        state.context_mut().unwrap().get(&point);

        DroneDestructor::destroy(&mut state, Lifecycle::Method).unwrap();

        assert!(state.context().unwrap().is_empty());
    }
}
