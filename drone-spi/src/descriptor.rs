//! Extension configuration consumed by [Configurator](crate::service::Configurator)s. The
//! descriptor consists of named extension sections, each holding flat string properties. A drone
//! configuration named `webdriver` reads its defaults from the `webdriver` section, while points
//! qualified with `@Different` additionally read `webdriver-different`, overriding any defaults.
//!
//! The descriptor can be built in code or loaded from the `extensions` key of an
//! `arquillian.json` file:
//!
//! ```json
//! {
//!   "extensions": {
//!     "webdriver": { "browser": "firefox" },
//!     "webdriver-different": { "browser": "chrome" }
//!   }
//! }
//! ```

use crate::drone_point::Qualifier;
use crate::error::DescriptorError;
use config::{Config, File};
use convert_case::{Case, Casing};
use fxhash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Name of the default descriptor file.
pub const DESCRIPTOR_FILE: &str = "arquillian.json";

pub type ExtensionProperties = FxHashMap<String, String>;

/// Flat extension configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ArquillianDescriptor {
    #[serde(default)]
    extensions: FxHashMap<String, ExtensionProperties>,
}

impl ArquillianDescriptor {
    /// Loads the descriptor from given file. A missing file results in an empty descriptor.
    pub fn from_file(path: &str) -> Result<Self, DescriptorError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(|error| DescriptorError::Load(Arc::new(error)))
    }

    /// Adds or extends a whole extension section.
    pub fn with_extension<N, I, K, V>(mut self, name: N, properties: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extensions.entry(name.into()).or_default().extend(
            properties
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    /// Sets a single property in given extension section.
    pub fn with_property<N, K, V>(self, extension: N, key: K, value: V) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_extension(extension, [(key, value)])
    }

    #[inline]
    pub fn extension(&self, name: &str) -> Option<&ExtensionProperties> {
        self.extensions.get(name)
    }

    /// Name of the section overriding `configuration_name` for given qualifier.
    pub fn qualified_extension_name(configuration_name: &str, qualifier: &Qualifier) -> String {
        format!("{}-{}", configuration_name, qualifier.descriptor_key())
    }

    /// Returns properties of the default section merged with the qualifier section, if any.
    /// Qualified values take precedence.
    pub fn properties_for(
        &self,
        configuration_name: &str,
        qualifier: Option<&Qualifier>,
    ) -> ExtensionProperties {
        let mut properties = self
            .extension(configuration_name)
            .cloned()
            .unwrap_or_default();

        if let Some(qualifier) = qualifier {
            let name = Self::qualified_extension_name(configuration_name, qualifier);
            if let Some(overrides) = self.extension(&name) {
                debug!("Applying {} properties from extension '{}'.", overrides.len(), name);
                properties.extend(overrides.clone());
            }
        }

        properties
    }

    /// Checks if there's any section for given configuration and qualifier.
    pub fn has_properties_for(&self, configuration_name: &str, qualifier: Option<&Qualifier>) -> bool {
        match qualifier {
            Some(qualifier) => self.extensions.contains_key(&Self::qualified_extension_name(
                configuration_name,
                qualifier,
            )),
            None => self.extensions.contains_key(configuration_name),
        }
    }

    /// Maps merged properties (see [Self::properties_for]) onto a deserializable configuration.
    /// Property names are converted to snake case, so `remoteAddress` fills a `remote_address`
    /// field. String values are converted to the field types, e.g. `"true"` to `bool`.
    pub fn map_configuration<C: DeserializeOwned>(
        &self,
        configuration_name: &str,
        qualifier: Option<&Qualifier>,
    ) -> Result<C, DescriptorError> {
        let to_error = |error| DescriptorError::Mapping {
            extension: configuration_name.to_string(),
            source: Arc::new(error),
        };

        self.properties_for(configuration_name, qualifier)
            .into_iter()
            .try_fold(Config::builder(), |builder, (key, value)| {
                builder.set_override(key.to_case(Case::Snake), value)
            })
            .and_then(|builder| builder.build())
            .and_then(|config| config.try_deserialize::<C>())
            .map_err(to_error)
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::ArquillianDescriptor;
    use crate::drone_point::Qualifier;
    use serde::Deserialize;

    #[derive(Deserialize, Default, Debug, PartialEq)]
    #[serde(default)]
    struct TestConfiguration {
        field: String,
        remote_address: String,
        headless: bool,
    }

    fn create_descriptor() -> ArquillianDescriptor {
        ArquillianDescriptor::default()
            .with_extension("mock", [("field", "default"), ("headless", "true")])
            .with_property("mock-different", "field", "different")
            .with_property("mock-different", "remoteAddress", "http://localhost:4444")
    }

    #[test]
    fn should_return_default_properties() {
        let properties = create_descriptor().properties_for("mock", None);
        assert_eq!(properties.get("field").unwrap(), "default");
        assert!(!properties.contains_key("remoteAddress"));
    }

    #[test]
    fn should_override_default_properties() {
        let properties =
            create_descriptor().properties_for("mock", Some(&Qualifier::new("Different")));
        assert_eq!(properties.get("field").unwrap(), "different");
        assert_eq!(properties.get("headless").unwrap(), "true");
    }

    #[test]
    fn should_not_mix_qualifiers() {
        let properties =
            create_descriptor().properties_for("mock", Some(&Qualifier::new("Other")));
        assert_eq!(properties.get("field").unwrap(), "default");
        assert!(!create_descriptor().has_properties_for("mock", Some(&Qualifier::new("Other"))));
    }

    #[test]
    fn should_map_configuration() {
        let configuration: TestConfiguration = create_descriptor()
            .map_configuration("mock", Some(&Qualifier::new("Different")))
            .unwrap();

        assert_eq!(
            configuration,
            TestConfiguration {
                field: "different".to_string(),
                remote_address: "http://localhost:4444".to_string(),
                headless: true,
            }
        );
    }

    #[test]
    fn should_map_missing_extension_to_defaults() {
        let configuration: TestConfiguration = ArquillianDescriptor::default()
            .map_configuration("mock", None)
            .unwrap();

        assert_eq!(configuration, TestConfiguration::default());
    }

    #[test]
    fn should_load_missing_file_as_empty() {
        assert_eq!(
            ArquillianDescriptor::from_file("missing-descriptor-file.json").unwrap(),
            ArquillianDescriptor::default()
        );
    }
}
