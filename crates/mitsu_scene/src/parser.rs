//! Schema-driven tree builder.
//!
//! Walks the element tree recursively, dispatching each child to a property
//! parser, a meta-tag handler (`ref`, `default`, `include`, `alias`, `null`)
//! or a nested object parse according to the current kind's permitted-child
//! table. The argument container is cloned on entry to every node, so
//! `<default>` declarations are visible to the declaring subtree only.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use mitsu_math::{Transform, Vec3};

use crate::error::{LoadError, LoadResult};
use crate::object::{Object, ObjectKind, Scene, Version};
use crate::property::{Animation, Blackbody, Property, Rgb, Spectrum, SpectrumSample};
use crate::registry::IdRegistry;
use crate::schema::{schema_for, MetaTags, Schema};
use crate::values::{parse_bool, parse_integers, parse_numbers, parse_vector, substitute, Arguments};
use crate::xml::Element;

const PROPERTY_TAGS: [&str; 11] = [
    "integer",
    "float",
    "vector",
    "point",
    "bool",
    "string",
    "rgb",
    "spectrum",
    "blackbody",
    "transform",
    "animation",
];

/// One scene load in progress: the id registry, the active lookup
/// directories, and the include-cycle guard.
pub(crate) struct TreeBuilder {
    lookup_dirs: Vec<PathBuf>,
    lowercase: bool,
    registry: IdRegistry,
    include_stack: Vec<PathBuf>,
}

impl TreeBuilder {
    pub(crate) fn new(lookup_dirs: Vec<PathBuf>, lowercase: bool) -> Self {
        Self {
            lookup_dirs,
            lowercase,
            registry: IdRegistry::new(),
            include_stack: Vec::new(),
        }
    }

    /// Mark a document path as being loaded so a self-include is caught.
    pub(crate) fn guard_include(&mut self, path: PathBuf) {
        self.include_stack.push(path);
    }

    /// Parse a whole document from its root element.
    pub(crate) fn build_scene<E: Element>(
        &mut self,
        root: &E,
        args: &Arguments,
    ) -> LoadResult<Scene> {
        if self.tag_of(root) != "scene" {
            return Err(LoadError::NotAScene(root.tag().to_string()));
        }

        let version = match self.attr(root, "version") {
            Some(text) => Version::parse(text)?,
            None => Version::default(),
        };

        let mut scene = Object::new(ObjectKind::Scene);
        self.build_object(&mut scene, root, args, schema_for(ObjectKind::Scene))?;

        Ok(Scene::new(version, scene))
    }

    fn build_object<E: Element>(
        &mut self,
        obj: &mut Object,
        element: &E,
        parent_args: &Arguments,
        schema: &Schema,
    ) -> LoadResult<()> {
        // Scoped copy: defaults declared below must not leak to siblings
        let mut args = parent_args.clone();

        for child in element.child_elements() {
            if schema.meta.contains(MetaTags::PARAMETER) && self.try_property(obj, &child, &args)? {
                continue;
            }

            let tag = self.tag_of(&child);
            match tag.as_str() {
                "ref" if schema.meta.contains(MetaTags::REFERENCE) => {
                    self.handle_reference(obj, &child, &args, schema)?;
                }
                "default" if schema.meta.contains(MetaTags::DEFAULT) => {
                    self.handle_default(&mut args, &child)?;
                }
                "include" if schema.meta.contains(MetaTags::INCLUDE) => {
                    self.handle_include(obj, &child, &args)?;
                }
                "alias" if schema.meta.contains(MetaTags::ALIAS) => {
                    self.handle_alias(&child)?;
                }
                "null" if schema.meta.contains(MetaTags::NULL) => {}
                _ => match ObjectKind::from_tag(&tag).filter(|k| schema.kinds.contains(*k)) {
                    Some(kind) => self.build_child(obj, &child, &args, kind)?,
                    None => return Err(LoadError::InvalidTag(tag)),
                },
            }
        }

        Ok(())
    }

    fn build_child<E: Element>(
        &mut self,
        parent: &mut Object,
        element: &E,
        args: &Arguments,
        kind: ObjectKind,
    ) -> LoadResult<()> {
        let mut child = Object::new(kind);
        if let Some(plugin_type) = self.attr(element, "type") {
            child.set_plugin_type(plugin_type);
        }
        if let Some(id) = self.attr(element, "id") {
            child.set_id(id);
        }

        self.build_object(&mut child, element, args, schema_for(kind))?;

        let child = Arc::new(child);
        if let Some(id) = child.id() {
            if !self.registry.register(id, child.clone()) {
                log::warn!("duplicate id '{}' ignored, keeping first declaration", id);
            }
        }

        match self.attr(element, "name") {
            Some(name) => parent.add_named_child(name, child),
            None => parent.add_anonymous_child(child),
        }

        Ok(())
    }

    fn handle_reference<E: Element>(
        &mut self,
        obj: &mut Object,
        element: &E,
        args: &Arguments,
        schema: &Schema,
    ) -> LoadResult<()> {
        let id = self.require_attr(element, "ref", "id")?;
        let id = substitute(id, args)?;

        let node = self
            .registry
            .get(&id)
            .cloned()
            .ok_or_else(|| LoadError::UnknownId(id.clone()))?;

        if !schema.kinds.contains(node.kind()) {
            return Err(LoadError::DisallowedReference(id));
        }

        // Shared, not copied
        obj.add_anonymous_child(node);
        Ok(())
    }

    fn handle_default<E: Element>(&self, args: &mut Arguments, element: &E) -> LoadResult<()> {
        let name = self.require_attr(element, "default", "name")?;
        let value = self.require_attr(element, "default", "value")?;

        // First writer wins; external arguments pre-exist and always win
        args.entry(name.to_string())
            .or_insert_with(|| value.to_string());
        Ok(())
    }

    fn handle_alias<E: Element>(&mut self, element: &E) -> LoadResult<()> {
        let id = self.require_attr(element, "alias", "id")?;
        let alias = self.require_attr(element, "alias", "as")?;

        let node = self
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| LoadError::UnknownId(id.to_string()))?;

        if self.registry.contains(alias) {
            return Err(LoadError::IdAlreadyRegistered(alias.to_string()));
        }

        self.registry.register(alias, node);
        Ok(())
    }

    fn handle_include<E: Element>(
        &mut self,
        obj: &mut Object,
        element: &E,
        args: &Arguments,
    ) -> LoadResult<()> {
        let filename = self.require_attr(element, "include", "filename")?;
        let filename = substitute(filename, args)?;

        let path = self
            .lookup_dirs
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.is_file())
            .or_else(|| {
                let raw = PathBuf::from(&filename);
                raw.is_file().then_some(raw)
            })
            .ok_or_else(|| LoadError::IncludeNotFound(filename.clone()))?;

        let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if self.include_stack.contains(&canonical) {
            return Err(LoadError::IncludeCycle(filename));
        }

        let text = fs::read_to_string(&path)?;
        let doc = roxmltree::Document::parse(&text)?;
        let root = doc.root_element();

        if self.tag_of(&root) != "scene" {
            return Err(LoadError::NotAScene(Element::tag(&root).to_string()));
        }
        // The included document's version attribute is ignored.

        // Children are spliced into the current node under the scene-root
        // mask; the included file's directory joins the lookup list for its
        // own nested includes.
        let pushed_dir = path.parent().map(|dir| dir.to_path_buf());
        if let Some(dir) = &pushed_dir {
            self.lookup_dirs.insert(0, dir.clone());
        }
        self.include_stack.push(canonical);

        let result = self.build_object(obj, &root, args, schema_for(ObjectKind::Scene));

        self.include_stack.pop();
        if pushed_dir.is_some() {
            self.lookup_dirs.remove(0);
        }

        result
    }

    /// Try to parse `element` as a property of `obj`. Returns false when the
    /// element is not a property (no `name` attribute or unknown tag). A
    /// value that fails to parse is skipped without error.
    fn try_property<E: Element>(
        &self,
        obj: &mut Object,
        element: &E,
        args: &Arguments,
    ) -> LoadResult<bool> {
        let Some(name) = self.attr(element, "name") else {
            return Ok(false);
        };

        let tag = self.tag_of(element);
        if !PROPERTY_TAGS.contains(&tag.as_str()) {
            return Ok(false);
        }

        let prop = match tag.as_str() {
            "integer" => self.parse_integer_prop(element, args)?,
            "float" => self.parse_number_prop(element, args)?,
            "vector" | "point" => self.parse_vector_prop(element, args)?,
            "bool" => self.parse_bool_prop(element, args)?,
            "string" => self.parse_string_prop(element, args)?,
            "rgb" => self.parse_rgb_prop(element, args)?,
            "spectrum" => self.parse_spectrum_prop(element, args)?,
            "blackbody" => self.parse_blackbody_prop(element, args)?,
            "transform" => Property::from(self.parse_transform_block(element, args)?),
            "animation" => self.parse_animation_prop(element, args)?,
            _ => unreachable!(),
        };

        if prop.is_valid() {
            obj.set_property(name, prop);
        }

        Ok(true)
    }

    fn parse_integer_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        Ok(match self.integer_attr(element, "value", args)? {
            Some(value) => Property::from(value),
            None => Property::None,
        })
    }

    fn parse_number_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        Ok(match self.number_attr(element, "value", args)? {
            Some(value) => Property::from(value),
            None => Property::None,
        })
    }

    fn parse_vector_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        if self.attr(element, "value").is_some() {
            return Ok(match self.vector_attr(element, "value", args, 0.0)? {
                Some(v) => Property::from(v),
                None => Property::None,
            });
        }

        // Per-axis form: every axis must parse
        let (Some(x), Some(y), Some(z)) = (
            self.number_attr(element, "x", args)?,
            self.number_attr(element, "y", args)?,
            self.number_attr(element, "z", args)?,
        ) else {
            return Ok(Property::None);
        };

        Ok(Property::from(Vec3::new(x, y, z)))
    }

    fn parse_bool_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        let Some(value) = self.attr(element, "value") else {
            return Ok(Property::None);
        };
        let text = substitute(value, args)?;
        Ok(match parse_bool(&text) {
            Some(b) => Property::from(b),
            None => Property::None,
        })
    }

    fn parse_string_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        let Some(value) = self.attr(element, "value") else {
            return Ok(Property::None);
        };
        Ok(Property::from(substitute(value, args)?))
    }

    fn parse_rgb_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        if self.attr(element, "value").is_some() {
            return Ok(match self.vector_attr(element, "value", args, 0.0)? {
                Some(v) => Property::from(Rgb::new(v.x, v.y, v.z)),
                None => Property::None,
            });
        }

        let (Some(r), Some(g), Some(b)) = (
            self.number_attr(element, "r", args)?,
            self.number_attr(element, "g", args)?,
            self.number_attr(element, "b", args)?,
        ) else {
            return Ok(Property::None);
        };

        Ok(Property::from(Rgb::new(r, g, b)))
    }

    fn parse_spectrum_prop<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Property> {
        // .spd spectrum files are not supported; the property is skipped
        if self.attr(element, "filename").is_some() {
            return Ok(Property::None);
        }

        let Some(value) = self.attr(element, "value") else {
            return Ok(Property::None);
        };
        let text = substitute(value, args)?;

        if !text.contains(':') {
            let mut tmp = [0.0f32; 1];
            return Ok(if parse_numbers(&text, &mut tmp) == 1 {
                Property::from(Spectrum::Uniform(tmp[0]))
            } else {
                Property::None
            });
        }

        // wavelength:weight pairs, separated by whitespace or commas,
        // kept in source order
        let mut samples = Vec::new();
        for token in text
            .split(|c: char| c == ',' || c.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
        {
            let Some((wavelength, weight)) = token.split_once(':') else {
                return Ok(Property::None);
            };
            let (Ok(wavelength), Ok(weight)) =
                (wavelength.trim().parse::<i32>(), weight.trim().parse::<f32>())
            else {
                return Ok(Property::None);
            };
            samples.push(SpectrumSample { wavelength, weight });
        }

        Ok(Property::from(Spectrum::Sampled(samples)))
    }

    fn parse_blackbody_prop<E: Element>(
        &self,
        element: &E,
        args: &Arguments,
    ) -> LoadResult<Property> {
        let Some(temperature) = self.number_attr(element, "temperature", args)? else {
            return Ok(Property::None);
        };
        let scale = self.number_attr(element, "scale", args)?.unwrap_or(1.0);
        Ok(Property::from(Blackbody::new(temperature, scale)))
    }

    fn parse_animation_prop<E: Element>(
        &self,
        element: &E,
        args: &Arguments,
    ) -> LoadResult<Property> {
        let mut animation = Animation::new();
        for child in element.child_elements() {
            let tag = self.tag_of(&child);
            if tag != "transform" {
                return Err(LoadError::AnimationEntry(tag));
            }
            let time = self
                .number_attr(&child, "time", args)?
                .ok_or(LoadError::AnimationMissingTime)?;
            animation.add_keyframe(time, self.parse_transform_block(&child, args)?);
        }
        Ok(Property::from(animation))
    }

    /// Compose the transform-op children of a `<transform>` block in document
    /// order: the first child is applied to points first. Unrecognized
    /// children are ignored.
    fn parse_transform_block<E: Element>(
        &self,
        element: &E,
        args: &Arguments,
    ) -> LoadResult<Transform> {
        let mut composed = Transform::identity();

        for child in element.child_elements() {
            let tag = self.tag_of(&child);
            let matrix = match tag.as_str() {
                "translate" => Some(self.parse_translate(&child, args)?),
                "scale" => Some(self.parse_scale(&child, args)?),
                "rotate" => Some(self.parse_rotate(&child, args)?),
                "lookat" | "lookAt" => Some(self.parse_look_at(&child, args)?),
                "matrix" => Some(self.parse_matrix(&child, args)?),
                _ => None,
            };

            if let Some(matrix) = matrix {
                composed = matrix * composed;
            }
        }

        Ok(composed)
    }

    fn parse_translate<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Transform> {
        let delta = if self.attr(element, "value").is_some() {
            self.vector_attr(element, "value", args, 0.0)?
                .unwrap_or(Vec3::ZERO)
        } else {
            Vec3::new(
                self.number_attr(element, "x", args)?.unwrap_or(0.0),
                self.number_attr(element, "y", args)?.unwrap_or(0.0),
                self.number_attr(element, "z", args)?.unwrap_or(0.0),
            )
        };
        Ok(Transform::from_translation(delta))
    }

    fn parse_scale<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Transform> {
        let scale = if self.attr(element, "value").is_some() {
            // Fill value 1: unmodified axes keep unit scale
            self.vector_attr(element, "value", args, 1.0)?
                .unwrap_or(Vec3::ONE)
        } else {
            Vec3::new(
                self.number_attr(element, "x", args)?.unwrap_or(1.0),
                self.number_attr(element, "y", args)?.unwrap_or(1.0),
                self.number_attr(element, "z", args)?.unwrap_or(1.0),
            )
        };
        Ok(Transform::from_scale(scale))
    }

    fn parse_rotate<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Transform> {
        let axis = if self.attr(element, "axis").is_some() {
            self.vector_attr(element, "axis", args, 0.0)?
                .unwrap_or(Vec3::Z)
        } else {
            Vec3::new(
                self.number_attr(element, "x", args)?.unwrap_or(0.0),
                self.number_attr(element, "y", args)?.unwrap_or(0.0),
                self.number_attr(element, "z", args)?.unwrap_or(1.0),
            )
        };

        Ok(match self.number_attr(element, "angle", args)? {
            Some(angle) => Transform::from_rotation(axis, angle),
            None => Transform::identity(),
        })
    }

    fn parse_look_at<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Transform> {
        let Some(origin) = self.vector_attr(element, "origin", args, 0.0)? else {
            return Ok(Transform::identity());
        };
        let Some(target) = self.vector_attr(element, "target", args, 0.0)? else {
            return Ok(Transform::identity());
        };
        let up = self
            .vector_attr(element, "up", args, 0.0)?
            .unwrap_or(Vec3::Z);

        Ok(Transform::from_look_at(origin, target, up))
    }

    fn parse_matrix<E: Element>(&self, element: &E, args: &Arguments) -> LoadResult<Transform> {
        let Some(value) = self.attr(element, "value") else {
            return Ok(Transform::identity());
        };
        let text = substitute(value, args)?;

        let mut tmp = [0.0f32; 16];
        let count = parse_numbers(&text, &mut tmp);

        // 3x3, 3x4 or 4x4 row-major; anything else degrades to the identity
        Ok(Transform::from_row_slice(&tmp[..count]).unwrap_or_else(Transform::identity))
    }

    // --- attribute helpers -------------------------------------------------

    /// Tag name, lower-cased unless the loader disabled normalization.
    fn tag_of<E: Element>(&self, element: &E) -> String {
        if self.lowercase {
            element.tag().to_ascii_lowercase()
        } else {
            element.tag().to_string()
        }
    }

    /// Attribute lookup honoring the case-normalization toggle. `name` must
    /// be given lower-cased.
    fn attr<'e, E: Element>(&self, element: &'e E, name: &str) -> Option<&'e str> {
        if self.lowercase {
            element
                .attrs()
                .into_iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        } else {
            element.attr(name)
        }
    }

    fn require_attr<'e, E: Element>(
        &self,
        element: &'e E,
        element_name: &'static str,
        name: &'static str,
    ) -> LoadResult<&'e str> {
        self.attr(element, name).ok_or(LoadError::MissingAttribute {
            element: element_name,
            attribute: name,
        })
    }

    /// Substituted numeric attribute; `None` when absent or unparseable.
    fn number_attr<E: Element>(
        &self,
        element: &E,
        name: &str,
        args: &Arguments,
    ) -> LoadResult<Option<f32>> {
        let Some(value) = self.attr(element, name) else {
            return Ok(None);
        };
        let text = substitute(value, args)?;
        let mut tmp = [0.0f32; 1];
        Ok((parse_numbers(&text, &mut tmp) == 1).then_some(tmp[0]))
    }

    fn integer_attr<E: Element>(
        &self,
        element: &E,
        name: &str,
        args: &Arguments,
    ) -> LoadResult<Option<i64>> {
        let Some(value) = self.attr(element, name) else {
            return Ok(None);
        };
        let text = substitute(value, args)?;
        let mut tmp = [0i64; 1];
        Ok((parse_integers(&text, &mut tmp) == 1).then_some(tmp[0]))
    }

    fn vector_attr<E: Element>(
        &self,
        element: &E,
        name: &str,
        args: &Arguments,
        fill: f32,
    ) -> LoadResult<Option<Vec3>> {
        let Some(value) = self.attr(element, name) else {
            return Ok(None);
        };
        let text = substitute(value, args)?;
        Ok(parse_vector(&text, fill))
    }
}
