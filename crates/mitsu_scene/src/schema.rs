//! Per-kind permitted-child tables.
//!
//! Each object kind allows a fixed set of meta tags (parameters, refs,
//! defaults, ...) and a fixed set of child object kinds, derived from the
//! document schema. Every kind shares the "object group" baseline of
//! parameters plus defaults; the tables below extend it per kind.

use bitflags::bitflags;

use crate::object::ObjectKind;

bitflags! {
    /// Non-object tags that may appear directly under a node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct MetaTags: u8 {
        const PARAMETER = 1 << 0;
        const REFERENCE = 1 << 1;
        const DEFAULT = 1 << 2;
        const ALIAS = 1 << 3;
        const INCLUDE = 1 << 4;
        const NULL = 1 << 5;
    }
}

/// A small const bitset over [`ObjectKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KindSet(u16);

impl KindSet {
    pub(crate) const EMPTY: KindSet = KindSet(0);

    const fn bit(kind: ObjectKind) -> u16 {
        1 << kind as u16
    }

    pub(crate) const fn with(self, kind: ObjectKind) -> KindSet {
        KindSet(self.0 | Self::bit(kind))
    }

    pub(crate) fn contains(&self, kind: ObjectKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    const fn all_child_kinds() -> KindSet {
        let mut set = KindSet(0);
        let mut i = 0;
        while i < ObjectKind::CHILD_KINDS.len() {
            set = set.with(ObjectKind::CHILD_KINDS[i]);
            i += 1;
        }
        set
    }
}

/// What a node of a given kind may contain.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Schema {
    pub(crate) meta: MetaTags,
    pub(crate) kinds: KindSet,
}

const OBJECT_GROUP: MetaTags = MetaTags::PARAMETER.union(MetaTags::DEFAULT);
const OBJECT_GROUP_REF: MetaTags = OBJECT_GROUP.union(MetaTags::REFERENCE);

const SCENE: Schema = Schema {
    meta: OBJECT_GROUP
        .union(MetaTags::ALIAS)
        .union(MetaTags::INCLUDE)
        .union(MetaTags::NULL),
    kinds: KindSet::all_child_kinds(),
};

const BSDF: Schema = Schema {
    meta: OBJECT_GROUP_REF,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Phase)
        .with(ObjectKind::Texture)
        .with(ObjectKind::Bsdf),
};

const EMITTER: Schema = Schema {
    meta: OBJECT_GROUP_REF,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Texture)
        .with(ObjectKind::Emitter)
        .with(ObjectKind::Medium),
};

const FILM: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY.with(ObjectKind::Rfilter),
};

const INTEGRATOR: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Integrator)
        .with(ObjectKind::Sampler),
};

const MEDIUM: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Shape)
        .with(ObjectKind::Volume)
        .with(ObjectKind::Phase),
};

const PHASE: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY.with(ObjectKind::Phase),
};

const SENSOR: Schema = Schema {
    meta: OBJECT_GROUP_REF,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Sensor)
        .with(ObjectKind::Film)
        .with(ObjectKind::Medium),
};

const SHAPE: Schema = Schema {
    meta: OBJECT_GROUP_REF,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Bsdf)
        .with(ObjectKind::Subsurface)
        .with(ObjectKind::Sensor)
        .with(ObjectKind::Emitter)
        .with(ObjectKind::Shape)
        .with(ObjectKind::Medium)
        .with(ObjectKind::Texture)
        .with(ObjectKind::Rfilter),
};

const SUBSURFACE: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Phase)
        .with(ObjectKind::Bsdf),
};

const TEXTURE: Schema = Schema {
    meta: OBJECT_GROUP_REF,
    kinds: KindSet::EMPTY
        .with(ObjectKind::Texture)
        .with(ObjectKind::Rfilter),
};

const VOLUME: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY.with(ObjectKind::Volume),
};

// Leaf kinds with no special children
const PLAIN: Schema = Schema {
    meta: OBJECT_GROUP,
    kinds: KindSet::EMPTY,
};

pub(crate) fn schema_for(kind: ObjectKind) -> &'static Schema {
    match kind {
        ObjectKind::Scene => &SCENE,
        ObjectKind::Bsdf => &BSDF,
        ObjectKind::Emitter => &EMITTER,
        ObjectKind::Film => &FILM,
        ObjectKind::Integrator => &INTEGRATOR,
        ObjectKind::Medium => &MEDIUM,
        ObjectKind::Phase => &PHASE,
        ObjectKind::Rfilter => &PLAIN,
        ObjectKind::Sampler => &PLAIN,
        ObjectKind::Sensor => &SENSOR,
        ObjectKind::Shape => &SHAPE,
        ObjectKind::Subsurface => &SUBSURFACE,
        ObjectKind::Texture => &TEXTURE,
        ObjectKind::Volume => &VOLUME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_root_permits_everything() {
        let schema = schema_for(ObjectKind::Scene);
        assert!(schema.meta.contains(MetaTags::PARAMETER));
        assert!(schema.meta.contains(MetaTags::ALIAS));
        assert!(schema.meta.contains(MetaTags::INCLUDE));
        assert!(schema.meta.contains(MetaTags::NULL));
        assert!(!schema.meta.contains(MetaTags::REFERENCE));
        for kind in ObjectKind::CHILD_KINDS {
            assert!(schema.kinds.contains(kind), "scene should allow {:?}", kind);
        }
        assert!(!schema.kinds.contains(ObjectKind::Scene));
    }

    #[test]
    fn test_bsdf_children() {
        let schema = schema_for(ObjectKind::Bsdf);
        assert!(schema.meta.contains(MetaTags::REFERENCE));
        assert!(schema.kinds.contains(ObjectKind::Texture));
        assert!(schema.kinds.contains(ObjectKind::Bsdf));
        assert!(!schema.kinds.contains(ObjectKind::Shape));
        assert!(!schema.meta.contains(MetaTags::INCLUDE));
    }

    #[test]
    fn test_plain_kinds() {
        for kind in [ObjectKind::Sampler, ObjectKind::Rfilter] {
            let schema = schema_for(kind);
            assert_eq!(schema.meta, OBJECT_GROUP);
            assert_eq!(schema.kinds, KindSet::EMPTY);
        }
    }
}
