// Re-export glam for convenience
pub use glam::*;

// Mitsu math types
mod transform;
pub use transform::Transform;
