//! Error type for scene loading.
//!
//! Loading stops at the first fatal condition; there is no partial-result
//! mode. Soft failures (a property value that does not parse, a duplicate id
//! declaration) are not errors and are skipped by the tree builder.

use thiserror::Error;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("expected root element to be 'scene', found '{0}'")]
    NotAScene(String),

    #[error("invalid version string '{0}'")]
    InvalidVersion(String),

    #[error("unknown variable ${0}")]
    UnknownVariable(String),

    #[error("invalid {element} element: missing '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("id '{0}' does not exist")]
    UnknownId(String),

    #[error("id '{0}' is not of an allowed type here")]
    DisallowedReference(String),

    #[error("id '{0}' already existent")]
    IdAlreadyRegistered(String),

    #[error("include file '{0}' not found")]
    IncludeNotFound(String),

    #[error("include cycle detected while loading '{0}'")]
    IncludeCycle(String),

    #[error("found invalid tag '{0}'")]
    InvalidTag(String),

    #[error("animation entries are only of type transform, found '{0}'")]
    AnimationEntry(String),

    #[error("animation entry missing time attribute")]
    AnimationMissingTime,
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;
