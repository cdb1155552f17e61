//! Addressing rules: where a document keeps its patchable nodes and how a
//! node is identified.

/// How the node collection is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionLayout {
    /// An array of objects, each carrying its identifier in `id_field`.
    ///
    /// When `parent_field` is set, a node names its parent there and removing a
    /// node also removes its descendants.
    Array {
        /// Field holding the node identifier.
        id_field: &'static str,
        /// Field holding the parent identifier, if the collection is a hierarchy.
        parent_field: Option<&'static str>,
    },
    /// An object whose keys are the node identifiers.
    Keyed,
}

/// Addressing rules for one kind of patchable document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Addressing {
    /// Document label used in errors and logs.
    pub name: &'static str,
    /// Object fields leading from the root to the node collection.
    pub collection: &'static [&'static str],
    /// Collection layout.
    pub layout: CollectionLayout,
}

impl Addressing {
    /// Pattern documents: `patternSet.patterns`, identified by `patternId`,
    /// hierarchy through `parentId`.
    #[must_use]
    pub const fn patterns() -> Self {
        Self {
            name: "pattern",
            collection: &["patternSet", "patterns"],
            layout: CollectionLayout::Array {
                id_field: "patternId",
                parent_field: Some("parentId"),
            },
        }
    }

    /// Attribute documents: `attributes`, keyed by scope.
    #[must_use]
    pub const fn attributes() -> Self {
        Self {
            name: "attribute",
            collection: &["attributes"],
            layout: CollectionLayout::Keyed,
        }
    }

    /// The identifier field for array layouts.
    #[must_use]
    pub const fn id_field(&self) -> Option<&'static str> {
        match self.layout {
            CollectionLayout::Array { id_field, .. } => Some(id_field),
            CollectionLayout::Keyed => None,
        }
    }

    /// The parent field for hierarchical array layouts.
    #[must_use]
    pub const fn parent_field(&self) -> Option<&'static str> {
        match self.layout {
            CollectionLayout::Array { parent_field, .. } => parent_field,
            CollectionLayout::Keyed => None,
        }
    }
}
