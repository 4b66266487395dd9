//! Declared-id bookkeeping for reference and alias resolution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::object::Object;

/// Maps declared ids to their nodes. The first registration of an id wins;
/// later declarations are refused and never overwrite (overwriting would
/// silently change which node existing references resolve to).
#[derive(Default)]
pub(crate) struct IdRegistry {
    map: HashMap<String, Arc<Object>>,
}

impl IdRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `id`, returning false if it was already taken.
    pub(crate) fn register(&mut self, id: &str, object: Arc<Object>) -> bool {
        if self.map.contains_key(id) {
            return false;
        }
        self.map.insert(id.to_string(), object);
        true
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Arc<Object>> {
        self.map.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;

    #[test]
    fn test_first_registration_wins() {
        let mut registry = IdRegistry::new();
        let first = Arc::new(Object::new(ObjectKind::Bsdf));
        let second = Arc::new(Object::new(ObjectKind::Shape));

        assert!(registry.register("mat", first.clone()));
        assert!(!registry.register("mat", second));

        assert_eq!(registry.get("mat").unwrap().kind(), ObjectKind::Bsdf);
    }

    #[test]
    fn test_alias_shares_node() {
        let mut registry = IdRegistry::new();
        let node = Arc::new(Object::new(ObjectKind::Texture));
        registry.register("tex", node.clone());

        let shared = registry.get("tex").unwrap().clone();
        registry.register("tex2", shared);

        assert!(Arc::ptr_eq(
            registry.get("tex").unwrap(),
            registry.get("tex2").unwrap()
        ));
    }
}
