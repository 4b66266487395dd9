//! Typed property values attached to scene objects.
//!
//! A property holds exactly one value of a closed set of kinds. Access is
//! "soft": asking for the wrong kind never panics and never mutates, it
//! simply reports the mismatch (`as_*` returns `None`, `*_or` returns the
//! caller's default).

use mitsu_math::{Transform, Vec3};

/// Discriminant of a [`Property`] value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    None,
    Bool,
    Integer,
    Number,
    Vector,
    Rgb,
    String,
    Spectrum,
    Blackbody,
    Transform,
    Animation,
}

/// A color with three channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// One wavelength/weight pair of a sampled spectrum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectrumSample {
    /// Wavelength in nanometers.
    pub wavelength: i32,
    pub weight: f32,
}

/// A spectral value: either a single scalar applying at all wavelengths, or
/// an ordered list of wavelength/weight pairs.
///
/// Samples keep the order and duplicates of the source text; no sorting or
/// deduplication is performed.
#[derive(Clone, Debug, PartialEq)]
pub enum Spectrum {
    Uniform(f32),
    Sampled(Vec<SpectrumSample>),
}

impl Spectrum {
    pub fn is_uniform(&self) -> bool {
        matches!(self, Spectrum::Uniform(_))
    }

    /// The uniform scalar, if this spectrum is uniform.
    pub fn uniform(&self) -> Option<f32> {
        match self {
            Spectrum::Uniform(v) => Some(*v),
            Spectrum::Sampled(_) => None,
        }
    }

    /// The sampled pairs; empty for a uniform spectrum.
    pub fn samples(&self) -> &[SpectrumSample] {
        match self {
            Spectrum::Uniform(_) => &[],
            Spectrum::Sampled(samples) => samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }
}

/// A blackbody radiator description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blackbody {
    /// Temperature in Kelvin.
    pub temperature: f32,
    pub scale: f32,
}

impl Blackbody {
    pub fn new(temperature: f32, scale: f32) -> Self {
        Self { temperature, scale }
    }
}

/// One keyframe of an animated transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub transform: Transform,
}

/// An animated transform: (time, transform) keyframes in encounter order.
/// Storage only; no interpolation or time ordering is applied here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    keyframes: Vec<Keyframe>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_keyframe(&mut self, time: f32, transform: Transform) {
        self.keyframes.push(Keyframe { time, transform });
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

/// A single typed value attached to an object by name.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Property {
    /// An unset or failed-to-parse value.
    #[default]
    None,
    Bool(bool),
    Integer(i64),
    Number(f32),
    Vector(Vec3),
    Rgb(Rgb),
    String(String),
    Spectrum(Spectrum),
    Blackbody(Blackbody),
    Transform(Transform),
    Animation(Animation),
}

impl Property {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::None => PropertyKind::None,
            Property::Bool(_) => PropertyKind::Bool,
            Property::Integer(_) => PropertyKind::Integer,
            Property::Number(_) => PropertyKind::Number,
            Property::Vector(_) => PropertyKind::Vector,
            Property::Rgb(_) => PropertyKind::Rgb,
            Property::String(_) => PropertyKind::String,
            Property::Spectrum(_) => PropertyKind::Spectrum,
            Property::Blackbody(_) => PropertyKind::Blackbody,
            Property::Transform(_) => PropertyKind::Transform,
            Property::Animation(_) => PropertyKind::Animation,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Property::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Property::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn bool_or(&self, def: bool) -> bool {
        self.as_bool().unwrap_or(def)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Property::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn integer_or(&self, def: i64) -> i64 {
        self.as_integer().unwrap_or(def)
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Property::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn number_or(&self, def: f32) -> f32 {
        self.as_number().unwrap_or(def)
    }

    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            Property::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vector_or(&self, def: Vec3) -> Vec3 {
        self.as_vector().unwrap_or(def)
    }

    pub fn as_rgb(&self) -> Option<Rgb> {
        match self {
            Property::Rgb(v) => Some(*v),
            _ => None,
        }
    }

    pub fn rgb_or(&self, def: Rgb) -> Rgb {
        self.as_rgb().unwrap_or(def)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Property::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn string_or<'a>(&'a self, def: &'a str) -> &'a str {
        self.as_string().unwrap_or(def)
    }

    pub fn as_spectrum(&self) -> Option<&Spectrum> {
        match self {
            Property::Spectrum(v) => Some(v),
            _ => None,
        }
    }

    pub fn spectrum_or<'a>(&'a self, def: &'a Spectrum) -> &'a Spectrum {
        self.as_spectrum().unwrap_or(def)
    }

    pub fn as_blackbody(&self) -> Option<Blackbody> {
        match self {
            Property::Blackbody(v) => Some(*v),
            _ => None,
        }
    }

    pub fn blackbody_or(&self, def: Blackbody) -> Blackbody {
        self.as_blackbody().unwrap_or(def)
    }

    pub fn as_transform(&self) -> Option<Transform> {
        match self {
            Property::Transform(v) => Some(*v),
            _ => None,
        }
    }

    pub fn transform_or(&self, def: Transform) -> Transform {
        self.as_transform().unwrap_or(def)
    }

    pub fn as_animation(&self) -> Option<&Animation> {
        match self {
            Property::Animation(v) => Some(v),
            _ => None,
        }
    }

    pub fn animation_or<'a>(&'a self, def: &'a Animation) -> &'a Animation {
        self.as_animation().unwrap_or(def)
    }
}

impl From<bool> for Property {
    fn from(v: bool) -> Self {
        Property::Bool(v)
    }
}

impl From<i64> for Property {
    fn from(v: i64) -> Self {
        Property::Integer(v)
    }
}

impl From<f32> for Property {
    fn from(v: f32) -> Self {
        Property::Number(v)
    }
}

impl From<Vec3> for Property {
    fn from(v: Vec3) -> Self {
        Property::Vector(v)
    }
}

impl From<Rgb> for Property {
    fn from(v: Rgb) -> Self {
        Property::Rgb(v)
    }
}

impl From<String> for Property {
    fn from(v: String) -> Self {
        Property::String(v)
    }
}

impl From<&str> for Property {
    fn from(v: &str) -> Self {
        Property::String(v.to_string())
    }
}

impl From<Spectrum> for Property {
    fn from(v: Spectrum) -> Self {
        Property::Spectrum(v)
    }
}

impl From<Blackbody> for Property {
    fn from(v: Blackbody) -> Self {
        Property::Blackbody(v)
    }
}

impl From<Transform> for Property {
    fn from(v: Transform) -> Self {
        Property::Transform(v)
    }
}

impl From<Animation> for Property {
    fn from(v: Animation) -> Self {
        Property::Animation(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_kinds() {
        assert_eq!(Property::from(false).kind(), PropertyKind::Bool);
        assert_eq!(Property::from(0i64).kind(), PropertyKind::Integer);
        assert_eq!(Property::from(0.0f32).kind(), PropertyKind::Number);
        assert_eq!(Property::from(Vec3::ZERO).kind(), PropertyKind::Vector);
        assert_eq!(
            Property::from(Rgb::new(0.0, 0.0, 0.0)).kind(),
            PropertyKind::Rgb
        );
        assert_eq!(Property::from("").kind(), PropertyKind::String);
        assert_eq!(
            Property::from(Spectrum::Uniform(1.0)).kind(),
            PropertyKind::Spectrum
        );
        assert_eq!(
            Property::from(Blackbody::new(6504.0, 1.0)).kind(),
            PropertyKind::Blackbody
        );
        assert_eq!(
            Property::from(Transform::identity()).kind(),
            PropertyKind::Transform
        );
        assert_eq!(
            Property::from(Animation::new()).kind(),
            PropertyKind::Animation
        );
        assert!(!Property::None.is_valid());
    }

    #[test]
    fn test_matching_access() {
        assert_eq!(Property::from(true).as_bool(), Some(true));
        assert_eq!(Property::from(42i64).as_integer(), Some(42));
        assert_eq!(Property::from(1.5f32).as_number(), Some(1.5));
        assert_eq!(Property::from("TEST").as_string(), Some("TEST"));
        assert_eq!(
            Property::from(Vec3::new(1.0, 0.0, 0.0)).as_vector(),
            Some(Vec3::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_mismatch_returns_default() {
        let prop = Property::from(42i64);
        assert_eq!(prop.as_number(), None);
        assert_eq!(prop.number_or(1.25), 1.25);
        assert_eq!(prop.bool_or(true), true);
        assert_eq!(prop.string_or("fallback"), "fallback");
        assert_eq!(prop.integer_or(0), 42);

        let uniform = Spectrum::Uniform(1.0);
        assert_eq!(prop.spectrum_or(&uniform), &uniform);
        let still = Animation::new();
        assert_eq!(prop.animation_or(&still), &still);

        let prop = Property::from(Spectrum::Uniform(42.0));
        assert_eq!(prop.spectrum_or(&uniform).uniform(), Some(42.0));
    }

    #[test]
    fn test_spectrum_accessors() {
        let uniform = Spectrum::Uniform(42.0);
        assert!(uniform.is_uniform());
        assert_eq!(uniform.uniform(), Some(42.0));
        assert_eq!(uniform.len(), 0);

        let sampled = Spectrum::Sampled(vec![
            SpectrumSample {
                wavelength: 560,
                weight: 0.5,
            },
            SpectrumSample {
                wavelength: 560,
                weight: 0.5,
            },
        ]);
        assert!(!sampled.is_uniform());
        assert_eq!(sampled.uniform(), None);
        // Duplicates are preserved verbatim
        assert_eq!(sampled.len(), 2);
    }
}
