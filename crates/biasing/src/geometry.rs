//! Named geometry lookups used to validate and scope policies

// standard library
use std::collections::{HashMap, HashSet};

// external crates
use nalgebra::Vector3;

/// Region every volume belongs to unless assigned elsewhere
pub const WORLD_REGION: &str = "DefaultRegionForTheWorld";

/// Placement of a geometry component relative to the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    /// Centre of the component in world coordinates
    pub translation: Vector3<f64>,
    /// Local z axis of the component in world coordinates
    pub axis: Vector3<f64>,
}

impl Component {
    pub fn new(translation: Vector3<f64>, axis: Vector3<f64>) -> Self {
        Self { translation, axis }
    }
}

/// Names known to the transport kernel's geometry
///
/// All lookups ignore case. The world region is always present.
///
/// ```rust
/// # use vrtools_biasing::GeometryCatalog;
/// let catalog = GeometryCatalog::new()
///     .with_region("Target")
///     .with_volume("Phantom");
///
/// assert!(catalog.has_region("target"));
/// assert!(catalog.has_region("DefaultRegionForTheWorld"));
/// assert!(catalog.has_volume("PHANTOM"));
/// assert!(!catalog.has_volume("Target"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCatalog {
    regions: HashSet<String>,
    volumes: HashSet<String>,
    components: HashMap<String, Component>,
}

impl GeometryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, name: &str) -> Self {
        self.regions.insert(name.to_lowercase());
        self
    }

    pub fn with_volume(mut self, name: &str) -> Self {
        self.volumes.insert(name.to_lowercase());
        self
    }

    /// Components are volumes with a known placement
    pub fn with_component(mut self, name: &str, component: Component) -> Self {
        self.volumes.insert(name.to_lowercase());
        self.components.insert(name.to_lowercase(), component);
        self
    }

    pub fn has_region(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(WORLD_REGION) || self.regions.contains(&name.to_lowercase())
    }

    pub fn has_volume(&self, name: &str) -> bool {
        self.volumes.contains(&name.to_lowercase())
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(&name.to_lowercase())
    }
}

/// Set of region or volume names a policy applies to
///
/// ```rust
/// # use vrtools_biasing::RegionSet;
/// let set = RegionSet::new(["Target", "Shield"]);
/// assert!(set.contains("target"));
/// assert!(!set.contains("World"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    names: Vec<String>,
}

impl RegionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
