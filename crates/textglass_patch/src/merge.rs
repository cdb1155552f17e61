//! The base/patch merge.
//!
//! One algorithm serves every patchable document; the [`Addressing`] value
//! supplies the only document-specific knowledge (where the nodes live and
//! how they are identified).

use std::collections::HashSet;
use std::sync::Arc;

use textglass_foundation::{DocArray, DocObject, Document, DocumentHeader, Error, Result};
use tracing::debug;

use crate::addressing::{Addressing, CollectionLayout};
use crate::op::{OpKind, PatchOp, PatchPlan};

/// Field of a patch document holding its operations.
pub const PATCH_FIELD: &str = "patch";

/// Merges a base document with an optional patch document.
#[derive(Clone, Copy, Debug)]
pub struct PatchMerger {
    addressing: Addressing,
}

impl PatchMerger {
    /// Creates a merger for the given addressing rules.
    #[must_use]
    pub const fn new(addressing: Addressing) -> Self {
        Self { addressing }
    }

    /// Merger for pattern documents.
    #[must_use]
    pub const fn patterns() -> Self {
        Self::new(Addressing::patterns())
    }

    /// Merger for attribute documents.
    #[must_use]
    pub const fn attributes() -> Self {
        Self::new(Addressing::attributes())
    }

    /// The addressing rules in use.
    #[must_use]
    pub const fn addressing(&self) -> &Addressing {
        &self.addressing
    }

    /// Produces the effective document for `base` overlaid with `patch`.
    ///
    /// Without a patch the base is returned as-is. Otherwise root fields of
    /// the patch (other than the header and `patch`) are merged over the base
    /// root, then the patch operations are applied in order.
    ///
    /// # Errors
    ///
    /// Returns a patch error for malformed or contradictory operations,
    /// overrides of missing nodes, adds of existing nodes, or out-of-range
    /// positions; an invalid-document error if the base is not an object or
    /// its node collection has the wrong shape.
    pub fn merge(&self, base: &Document, patch: Option<&Document>) -> Result<Document> {
        let Some(patch) = patch else {
            return Ok(base.clone());
        };

        let name = self.addressing.name;
        let base_root = base.as_object().ok_or_else(|| {
            Error::invalid_document(name, format!("expected an object, found {}", base.type_name()))
        })?;
        let patch_root = patch.as_object().ok_or_else(|| {
            Error::patch(None, format!("expected an object, found {}", patch.type_name()))
        })?;

        let plan = PatchPlan::from_document(patch, &self.addressing)?;
        let root = merge_root_fields(base_root, patch_root, self.addressing.collection, true)?;

        let collection = match &self.addressing.layout {
            CollectionLayout::Array {
                id_field,
                parent_field,
            } => {
                let mut nodes = self.array_collection(base)?;
                for op in plan.ops() {
                    nodes = apply_array_op(nodes, op, id_field, *parent_field)?;
                }
                Document::Array(nodes)
            }
            CollectionLayout::Keyed => {
                let mut nodes = self.keyed_collection(base)?;
                for op in plan.ops() {
                    nodes = apply_keyed_op(nodes, op)?;
                }
                Document::Object(nodes)
            }
        };

        debug!(
            document = name,
            operations = plan.len(),
            "merged patch into base document"
        );

        Ok(Document::Object(set_path(
            &root,
            self.addressing.collection,
            collection,
        )))
    }

    fn array_collection(&self, base: &Document) -> Result<DocArray> {
        match base.get_path(self.addressing.collection) {
            None => Ok(DocArray::new()),
            Some(Document::Array(nodes)) => Ok(nodes.clone()),
            Some(other) => Err(Error::invalid_document(
                self.addressing.name,
                format!(
                    "'{}' must be an array, found {}",
                    self.addressing.collection.join("."),
                    other.type_name()
                ),
            )),
        }
    }

    fn keyed_collection(&self, base: &Document) -> Result<DocObject> {
        match base.get_path(self.addressing.collection) {
            None => Ok(DocObject::new()),
            Some(Document::Object(nodes)) => Ok(nodes.clone()),
            Some(other) => Err(Error::invalid_document(
                self.addressing.name,
                format!(
                    "'{}' must be an object, found {}",
                    self.addressing.collection.join("."),
                    other.type_name()
                ),
            )),
        }
    }
}

/// Shallow-merges patch root fields over the base root.
///
/// Fields on the way to the node collection merge one level deeper, so
/// siblings of the collection can be patched without replacing it.
fn merge_root_fields(
    base: &DocObject,
    patch: &DocObject,
    collection: &[&str],
    top_level: bool,
) -> Result<DocObject> {
    let mut merged = base.clone();

    for (field, value) in patch.iter() {
        if top_level && (DocumentHeader::is_header_field(field) || &**field == PATCH_FIELD) {
            continue;
        }

        match collection.split_first() {
            Some((head, [])) if *head == &**field => {
                return Err(Error::patch(
                    None,
                    format!("'{field}' must be patched through operations"),
                ));
            }
            Some((head, rest)) if *head == &**field => {
                let Some(patch_inner) = value.as_object() else {
                    return Err(Error::patch(
                        None,
                        format!("'{field}' must be an object, found {}", value.type_name()),
                    ));
                };
                let base_inner = match base.get(&**field) {
                    Some(Document::Object(inner)) => inner.clone(),
                    _ => DocObject::new(),
                };
                let inner = merge_root_fields(&base_inner, patch_inner, rest, false)?;
                merged = merged.insert(Arc::clone(field), Document::Object(inner));
            }
            _ => merged = merged.insert(Arc::clone(field), value.clone()),
        }
    }

    Ok(merged)
}

/// Returns `root` with the value at `path` replaced, creating objects on the way.
fn set_path(root: &DocObject, path: &[&str], value: Document) -> DocObject {
    match path.split_first() {
        None => root.clone(),
        Some((head, [])) => root.insert((*head).into(), value),
        Some((head, rest)) => {
            let inner = match root.get(*head) {
                Some(Document::Object(inner)) => inner.clone(),
                _ => DocObject::new(),
            };
            root.insert((*head).into(), Document::Object(set_path(&inner, rest, value)))
        }
    }
}

fn node_id<'a>(node: &'a Document, field: &str) -> Option<&'a str> {
    node.get(field).and_then(Document::as_str)
}

fn apply_array_op(
    nodes: DocArray,
    op: &PatchOp,
    id_field: &str,
    parent_field: Option<&str>,
) -> Result<DocArray> {
    let id = &*op.id;
    let existing = nodes.position(|node| node_id(node, id_field) == Some(id));

    let nodes = match (op.kind, existing) {
        (OpKind::Add, Some(_)) => {
            return Err(Error::patch(
                Some(id),
                format!("entry {}: add of a node that already exists", op.entry),
            ));
        }
        (OpKind::Add, None) => {
            let node = Document::Object(op.fields.clone());
            match op.position {
                None => nodes.push_back(node),
                Some(position) => nodes
                    .insert(position, node)
                    .ok_or_else(|| out_of_range(op, position, nodes.len()))?,
            }
        }
        (OpKind::Override, None) => {
            return Err(Error::patch(
                Some(id),
                format!("entry {}: override of a node that does not exist", op.entry),
            ));
        }
        (OpKind::Override, Some(index)) => {
            let merged = override_fields(nodes.get(index), op)?;
            match op.position {
                None => nodes.update(index, merged).unwrap_or(nodes),
                Some(position) => {
                    let Some((rest, _)) = nodes.remove(index) else {
                        return Ok(nodes);
                    };
                    let len = rest.len();
                    rest.insert(position, merged)
                        .ok_or_else(|| out_of_range(op, position, len))?
                }
            }
        }
        (OpKind::Remove, None) => {
            debug!(id, "remove of an absent node ignored");
            nodes
        }
        (OpKind::Remove, Some(_)) => {
            let doomed = subtree(&nodes, id, id_field, parent_field);
            debug!(id, removed = doomed.len(), "removed node and descendants");
            nodes.retain(|node| node_id(node, id_field).is_none_or(|nid| !doomed.contains(nid)))
        }
    };

    debug!(op = %op.kind, id, "applied patch operation");
    Ok(nodes)
}

fn apply_keyed_op(nodes: DocObject, op: &PatchOp) -> Result<DocObject> {
    let id = &*op.id;
    let nodes = match (op.kind, nodes.get(id)) {
        (OpKind::Add, Some(_)) => {
            return Err(Error::patch(
                Some(id),
                format!("entry {}: add of a node that already exists", op.entry),
            ));
        }
        (OpKind::Add, None) => nodes.insert(Arc::clone(&op.id), Document::Object(op.fields.clone())),
        (OpKind::Override, None) => {
            return Err(Error::patch(
                Some(id),
                format!("entry {}: override of a node that does not exist", op.entry),
            ));
        }
        (OpKind::Override, Some(existing)) => {
            let merged = override_fields(Some(existing), op)?;
            nodes.insert(Arc::clone(&op.id), merged)
        }
        (OpKind::Remove, existing) => {
            if existing.is_none() {
                debug!(id, "remove of an absent node ignored");
            }
            nodes.remove(id)
        }
    };

    debug!(op = %op.kind, id, "applied patch operation");
    Ok(nodes)
}

fn override_fields(existing: Option<&Document>, op: &PatchOp) -> Result<Document> {
    match existing {
        Some(Document::Object(fields)) => Ok(Document::Object(fields.union(&op.fields))),
        Some(other) => Err(Error::patch(
            Some(&*op.id),
            format!(
                "entry {}: cannot override a node that is {}",
                op.entry,
                other.type_name()
            ),
        )),
        None => Err(Error::patch(
            Some(&*op.id),
            format!("entry {}: override of a node that does not exist", op.entry),
        )),
    }
}

/// Collects `root` and every node whose parent chain reaches it.
fn subtree<'a>(
    nodes: &'a DocArray,
    root: &'a str,
    id_field: &str,
    parent_field: Option<&str>,
) -> HashSet<&'a str> {
    let mut doomed = HashSet::from([root]);
    let Some(parent_field) = parent_field else {
        return doomed;
    };

    loop {
        let before = doomed.len();
        for node in nodes {
            if let (Some(nid), Some(parent)) = (node_id(node, id_field), node_id(node, parent_field)) {
                if doomed.contains(parent) {
                    doomed.insert(nid);
                }
            }
        }
        if doomed.len() == before {
            return doomed;
        }
    }
}

fn out_of_range(op: &PatchOp, position: usize, len: usize) -> Error {
    Error::patch(
        Some(&*op.id),
        format!(
            "entry {}: position {position} is out of range for {len} nodes",
            op.entry
        ),
    )
}
