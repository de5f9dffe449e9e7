//! Test lifecycle events delivered by the host test runner.

use derive_more::Display;
use drone_spi::injection::{TestClass, TestMethod};

/// Events driving creation and destruction of drones. The host runner fires them in the order:
/// `BeforeSuite`, then for each class `BeforeClass`, for each method `Before` and `After`, then
/// `AfterClass`, and finally `AfterSuite`.
#[derive(Clone, Debug, Display)]
pub enum TestLifecycleEvent {
    #[display(fmt = "BeforeSuite")]
    BeforeSuite,
    #[display(fmt = "BeforeClass({})", "_0.name()")]
    BeforeClass(TestClass),
    #[display(fmt = "Before({}::{})", "_0.class()", "_0.name()")]
    Before(TestMethod),
    #[display(fmt = "After({}::{})", "_0.class()", "_0.name()")]
    After(TestMethod),
    #[display(fmt = "AfterClass({})", "_0.name()")]
    AfterClass(TestClass),
    #[display(fmt = "AfterSuite")]
    AfterSuite,
}

impl TestLifecycleEvent {
    /// Teardown events are dispatched to observers in reverse priority order.
    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            TestLifecycleEvent::After(_)
                | TestLifecycleEvent::AfterClass(_)
                | TestLifecycleEvent::AfterSuite
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::event::TestLifecycleEvent;
    use drone_spi::injection::{TestClass, TestMethod};

    #[test]
    fn should_recognize_teardown_events() {
        let class = TestClass::new("Test", vec![]);
        let method = TestMethod::new("Test", "method");

        assert!(!TestLifecycleEvent::BeforeSuite.is_teardown());
        assert!(!TestLifecycleEvent::BeforeClass(class.clone()).is_teardown());
        assert!(!TestLifecycleEvent::Before(method.clone()).is_teardown());
        assert!(TestLifecycleEvent::After(method).is_teardown());
        assert!(TestLifecycleEvent::AfterClass(class).is_teardown());
        assert!(TestLifecycleEvent::AfterSuite.is_teardown());
    }

    #[test]
    fn should_display_event() {
        assert_eq!(
            TestLifecycleEvent::Before(TestMethod::new("Test", "method")).to_string(),
            "Before(Test::method)"
        );
    }
}
