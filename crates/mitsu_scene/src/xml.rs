//! Minimal element-tree capability the parser is written against.
//!
//! The tree builder only ever needs a tag name, attribute lookup, and the
//! ordered element children, so it is generic over this trait instead of one
//! XML library's node API. [`roxmltree`] provides the default backend.

/// One element of a parsed markup document.
pub trait Element: Sized {
    /// The element's tag name, without any namespace prefix.
    fn tag(&self) -> &str;

    /// Exact-match attribute lookup.
    fn attr(&self, name: &str) -> Option<&str>;

    /// All attributes as (name, value) pairs, in document order.
    fn attrs(&self) -> Vec<(&str, &str)>;

    /// Element children in document order (text and comments skipped).
    fn child_elements(&self) -> Vec<Self>;
}

impl<'a, 'input> Element for roxmltree::Node<'a, 'input> {
    fn tag(&self) -> &str {
        self.tag_name().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attribute(name)
    }

    fn attrs(&self) -> Vec<(&str, &str)> {
        self.attributes()
            .map(|a| (a.name(), a.value()))
            .collect()
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().filter(|n| n.is_element()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roxmltree_backend() {
        let doc = roxmltree::Document::parse(
            r#"<scene version="0.6"><shape type="sphere"/><!-- skip -->text<bsdf/></scene>"#,
        )
        .unwrap();
        let root = doc.root_element();

        assert_eq!(Element::tag(&root), "scene");
        assert_eq!(Element::attr(&root, "version"), Some("0.6"));
        assert_eq!(Element::attr(&root, "missing"), None);
        assert_eq!(root.attrs(), vec![("version", "0.6")]);

        let children = root.child_elements();
        assert_eq!(children.len(), 2);
        assert_eq!(Element::tag(&children[0]), "shape");
        assert_eq!(Element::tag(&children[1]), "bsdf");
    }
}
