//! Scene description loader for the Mitsuba XML dialect.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `Object`, `Property`
//! - **Loading**: schema-validated parsing of scene XML documents with
//!   `$variable` substitution, `<ref>`/`<alias>` id resolution and
//!   `<include>` handling
//!
//! # Example
//!
//! ```ignore
//! use mitsu_scene::SceneLoader;
//!
//! let scene = SceneLoader::new().load_from_file("cbox.xml")?;
//! for child in scene.anonymous_children() {
//!     println!("{:?} ({})", child.kind(), child.plugin_type().unwrap_or("?"));
//! }
//! ```

pub mod error;
pub mod loader;
pub mod object;
pub mod property;
pub mod xml;

mod parser;
mod registry;
mod schema;
mod values;

// Re-export commonly used types
pub use error::{LoadError, LoadResult};
pub use loader::SceneLoader;
pub use mitsu_math::Transform;
pub use object::{Object, ObjectKind, Scene, Version};
pub use property::{
    Animation, Blackbody, Keyframe, Property, PropertyKind, Rgb, Spectrum, SpectrumSample,
};
pub use values::Arguments;
