use drone_spi::descriptor::ArquillianDescriptor;
use drone_spi::drone_point::{DronePoint, DroneType, Qualifier};
use drone_spi::error::ErrorPtr;
use drone_spi::extension::ServiceLoader;
use drone_spi::service::{
    Configurator, ConfiguratorPtr, Destructor, DestructorPtr, DroneConfigurationAnyPtr,
    DroneInstanceAnyPtr, Instantiator, InstantiatorPtr,
};
use mockall::mock;

mock! {
    pub ServiceLoader {}

    impl ServiceLoader for ServiceLoader {
        fn configurators(&self) -> Vec<ConfiguratorPtr>;

        fn instantiators(&self) -> Vec<InstantiatorPtr>;

        fn destructors(&self) -> Vec<DestructorPtr>;
    }
}

mock! {
    pub Configurator {}

    impl Configurator for Configurator {
        fn drone_type(&self) -> DroneType;

        fn qualifier(&self) -> Option<Qualifier>;

        fn precedence(&self) -> i8;

        fn create_configuration(
            &self,
            descriptor: &ArquillianDescriptor,
            point: &DronePoint,
        ) -> Result<DroneConfigurationAnyPtr, ErrorPtr>;
    }
}

mock! {
    pub Instantiator {}

    impl Instantiator for Instantiator {
        fn drone_type(&self) -> DroneType;

        fn qualifier(&self) -> Option<Qualifier>;

        fn precedence(&self) -> i8;

        fn create_instance(
            &self,
            configuration: DroneConfigurationAnyPtr,
        ) -> Result<DroneInstanceAnyPtr, ErrorPtr>;
    }
}

mock! {
    pub Destructor {}

    impl Destructor for Destructor {
        fn drone_type(&self) -> DroneType;

        fn qualifier(&self) -> Option<Qualifier>;

        fn precedence(&self) -> i8;

        fn destroy_instance(&self, instance: DroneInstanceAnyPtr) -> Result<(), ErrorPtr>;
    }
}
