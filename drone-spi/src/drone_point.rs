//! Identity of a single place where a drone gets injected. A [DronePoint] is built from the
//! requested [DroneType], the [Lifecycle] of the injection location and the set of
//! [Qualifier]s attached to it. Points are plain values and serve as keys for
//! [DroneContext](crate::context::DroneContext) lookups.

use itertools::Itertools;
use std::any::{type_name, Any, TypeId};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Runtime identifier of a requested drone type.
#[derive(Clone, Copy, Debug)]
pub struct DroneType {
    id: TypeId,
    name: &'static str,
}

impl DroneType {
    pub fn of<T: Any + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for DroneType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DroneType {}

impl Hash for DroneType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for DroneType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Boundary deciding when a drone is created and destroyed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Lifecycle {
    /// Lives from the first enrichment of a test class until the class finishes.
    Class,
    /// Lives from the enrichment of a test method until the method finishes.
    Method,
}

/// Marker distinguishing multiple injection points of the same drone type.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Qualifier(String);

impl Qualifier {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Name of the qualifier as used in descriptor section names.
    pub fn descriptor_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<&str> for Qualifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of one field or method parameter receiving a drone.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DronePoint {
    drone_type: DroneType,
    lifecycle: Lifecycle,
    qualifiers: BTreeSet<Qualifier>,
}

impl DronePoint {
    pub fn new<I: IntoIterator<Item = Qualifier>>(
        drone_type: DroneType,
        lifecycle: Lifecycle,
        qualifiers: I,
    ) -> Self {
        Self {
            drone_type,
            lifecycle,
            qualifiers: qualifiers.into_iter().collect(),
        }
    }

    /// Creates a point for the default qualifier.
    pub fn unqualified(drone_type: DroneType, lifecycle: Lifecycle) -> Self {
        Self::new(drone_type, lifecycle, [])
    }

    #[inline]
    pub fn drone_type(&self) -> DroneType {
        self.drone_type
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn qualifiers(&self) -> &BTreeSet<Qualifier> {
        &self.qualifiers
    }

    /// Returns the single qualifier of this point, `Ok(None)` for the default qualifier or `Err`
    /// if there are multiple ones.
    pub fn single_qualifier(&self) -> Result<Option<&Qualifier>, usize> {
        match self.qualifiers.len() {
            0 => Ok(None),
            1 => Ok(self.qualifiers.iter().next()),
            count => Err(count),
        }
    }
}

impl Display for DronePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} drone {} [{}]",
            self.lifecycle,
            self.drone_type,
            self.qualifiers.iter().join(", ")
        )
    }
}
