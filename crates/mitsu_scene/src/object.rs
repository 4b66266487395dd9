//! Scene graph node types.
//!
//! An [`Object`] is one node of the parsed graph: a kind, an optional plugin
//! type, an optional declared id, named properties, and named plus anonymous
//! children. Nodes are immutable once parsing finishes; id-referenced nodes
//! are shared `Arc`s across parents, never copies.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::property::Property;

/// The fixed set of object kinds known to the schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Scene,
    Bsdf,
    Emitter,
    Film,
    Integrator,
    Medium,
    Phase,
    Rfilter,
    Sampler,
    Sensor,
    Shape,
    Subsurface,
    Texture,
    Volume,
}

impl ObjectKind {
    /// All kinds that may appear as child elements (everything but the root).
    pub(crate) const CHILD_KINDS: [ObjectKind; 13] = [
        ObjectKind::Bsdf,
        ObjectKind::Emitter,
        ObjectKind::Film,
        ObjectKind::Integrator,
        ObjectKind::Medium,
        ObjectKind::Phase,
        ObjectKind::Rfilter,
        ObjectKind::Sampler,
        ObjectKind::Sensor,
        ObjectKind::Shape,
        ObjectKind::Subsurface,
        ObjectKind::Texture,
        ObjectKind::Volume,
    ];

    /// The element tag naming this kind.
    pub fn tag_name(&self) -> &'static str {
        match self {
            ObjectKind::Scene => "scene",
            ObjectKind::Bsdf => "bsdf",
            ObjectKind::Emitter => "emitter",
            ObjectKind::Film => "film",
            ObjectKind::Integrator => "integrator",
            ObjectKind::Medium => "medium",
            ObjectKind::Phase => "phase",
            ObjectKind::Rfilter => "rfilter",
            ObjectKind::Sampler => "sampler",
            ObjectKind::Sensor => "sensor",
            ObjectKind::Shape => "shape",
            ObjectKind::Subsurface => "subsurface",
            ObjectKind::Texture => "texture",
            ObjectKind::Volume => "volume",
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Option<ObjectKind> {
        match tag {
            "bsdf" => Some(ObjectKind::Bsdf),
            "emitter" => Some(ObjectKind::Emitter),
            "film" => Some(ObjectKind::Film),
            "integrator" => Some(ObjectKind::Integrator),
            "medium" => Some(ObjectKind::Medium),
            "phase" => Some(ObjectKind::Phase),
            "rfilter" => Some(ObjectKind::Rfilter),
            "sampler" => Some(ObjectKind::Sampler),
            "sensor" => Some(ObjectKind::Sensor),
            "shape" => Some(ObjectKind::Shape),
            "subsurface" => Some(ObjectKind::Subsurface),
            "texture" => Some(ObjectKind::Texture),
            "volume" => Some(ObjectKind::Volume),
            _ => None,
        }
    }
}

/// One node of the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    kind: ObjectKind,
    plugin_type: Option<String>,
    id: Option<String>,
    properties: HashMap<String, Property>,
    named_children: HashMap<String, Arc<Object>>,
    anonymous_children: Vec<Arc<Object>>,
}

// Sentinel for property lookups on missing names
static NONE_PROPERTY: Property = Property::None;

impl Object {
    pub(crate) fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            plugin_type: None,
            id: None,
            properties: HashMap::new(),
            named_children: HashMap::new(),
            anonymous_children: Vec::new(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The concrete implementation name (the element's `type` attribute),
    /// e.g. "diffuse" for a BSDF. Orthogonal to the kind.
    pub fn plugin_type(&self) -> Option<&str> {
        self.plugin_type.as_deref()
    }

    pub(crate) fn set_plugin_type(&mut self, plugin_type: &str) {
        self.plugin_type = Some(plugin_type.to_string());
    }

    /// The id this node was declared under, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    /// Look up a property; a missing name yields `Property::None`.
    pub fn property(&self, name: &str) -> &Property {
        self.properties.get(name).unwrap_or(&NONE_PROPERTY)
    }

    pub fn properties(&self) -> &HashMap<String, Property> {
        &self.properties
    }

    pub(crate) fn set_property(&mut self, name: &str, prop: Property) {
        self.properties.insert(name.to_string(), prop);
    }

    pub fn named_child(&self, name: &str) -> Option<&Arc<Object>> {
        self.named_children.get(name)
    }

    pub fn named_children(&self) -> &HashMap<String, Arc<Object>> {
        &self.named_children
    }

    /// Children without a `name` attribute, in document order.
    pub fn anonymous_children(&self) -> &[Arc<Object>] {
        &self.anonymous_children
    }

    pub(crate) fn add_named_child(&mut self, name: &str, child: Arc<Object>) {
        self.named_children.insert(name.to_string(), child);
    }

    pub(crate) fn add_anonymous_child(&mut self, child: Arc<Object>) {
        self.anonymous_children.push(child);
    }
}

/// Scene description format version, `major.minor.patch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

impl Default for Version {
    /// Documents without a version attribute are treated as 0.6.0.
    fn default() -> Self {
        Self {
            major: 0,
            minor: 6,
            patch: 0,
        }
    }
}

impl Version {
    /// Parse `major[.minor[.patch]]`. A bare major greater than zero implies
    /// minor/patch 0; a bare "0" keeps the 0.6.0 default. Empty components
    /// ("12.3.") are fatal.
    pub fn parse(text: &str) -> LoadResult<Version> {
        let invalid = || LoadError::InvalidVersion(text.to_string());

        let parts: Vec<&str> = text.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut numbers = [0i32; 3];
        for (i, part) in parts.iter().enumerate() {
            numbers[i] = part.trim().parse::<i32>().map_err(|_| invalid())?;
        }

        let mut version = Version::default();
        version.major = numbers[0];
        if parts.len() >= 2 {
            version.minor = numbers[1];
            version.patch = 0;
        } else if version.major > 0 {
            version.minor = 0;
        }
        if parts.len() == 3 {
            version.patch = numbers[2];
        }

        Ok(version)
    }
}

/// A fully parsed scene: the root object plus the document version.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    version: Version,
    root: Object,
}

impl Scene {
    pub(crate) fn new(version: Version, root: Object) -> Self {
        debug_assert_eq!(root.kind(), ObjectKind::Scene);
        Self { version, root }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn root(&self) -> &Object {
        &self.root
    }
}

impl std::ops::Deref for Scene {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_round_trip() {
        for kind in ObjectKind::CHILD_KINDS {
            assert_eq!(ObjectKind::from_tag(kind.tag_name()), Some(kind));
        }
        // The root kind is not a valid child tag
        assert_eq!(ObjectKind::from_tag("scene"), None);
    }

    #[test]
    fn test_property_lookup_missing() {
        let obj = Object::new(ObjectKind::Shape);
        assert!(!obj.property("nope").is_valid());
    }

    #[test]
    fn test_last_property_write_wins() {
        let mut obj = Object::new(ObjectKind::Shape);
        obj.set_property("radius", Property::from(1.0f32));
        obj.set_property("radius", Property::from(2.0f32));
        assert_eq!(obj.property("radius").as_number(), Some(2.0));
        assert_eq!(obj.properties().len(), 1);
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(
            Version::parse("1.2.3").unwrap(),
            Version {
                major: 1,
                minor: 2,
                patch: 3
            }
        );
        assert_eq!(
            Version::parse("5").unwrap(),
            Version {
                major: 5,
                minor: 0,
                patch: 0
            }
        );
        assert_eq!(
            Version::parse("0").unwrap(),
            Version {
                major: 0,
                minor: 6,
                patch: 0
            }
        );
        assert_eq!(
            Version::parse("0.5").unwrap(),
            Version {
                major: 0,
                minor: 5,
                patch: 0
            }
        );
        assert!(Version::parse("12.3.").is_err());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("a.b").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
    }
}
