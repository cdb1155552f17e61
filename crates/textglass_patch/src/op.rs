//! Patch operations and their validation.
//!
//! Entries are parsed up front and checked for contradictions before any
//! of them is applied, so a rejected patch never yields a half-applied
//! document.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use textglass_foundation::{DocObject, Document, Error, Result};

use crate::addressing::{Addressing, CollectionLayout};

/// The operation an entry performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Introduce a node that does not exist yet.
    Add,
    /// Merge fields over an existing node.
    Override,
    /// Delete a node and its descendants.
    Remove,
}

impl OpKind {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "add" => Some(Self::Add),
            "override" => Some(Self::Override),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Override => "override",
            Self::Remove => "remove",
        })
    }
}

/// One parsed patch entry.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchOp {
    /// Operation kind.
    pub kind: OpKind,
    /// Identifier of the addressed node.
    pub id: Arc<str>,
    /// Fields to write (`add`/`override`); empty for `remove`.
    pub fields: DocObject,
    /// Requested index within the collection (array layout only).
    pub position: Option<usize>,
    /// Index of the entry within the patch, for error messages.
    pub entry: usize,
}

impl PatchOp {
    /// Parses entry number `entry` of a patch.
    ///
    /// # Errors
    ///
    /// Returns a patch error if the entry is malformed for `addressing`.
    pub fn parse(doc: &Document, entry: usize, addressing: &Addressing) -> Result<Self> {
        let malformed = |id: Option<&str>, msg: String| {
            Error::patch(id, format!("entry {entry}: {msg}"))
        };

        if !doc.is_object() {
            return Err(malformed(
                None,
                format!("expected an object, found {}", doc.type_name()),
            ));
        }

        let id: Arc<str> = match doc.get("id") {
            Some(Document::String(s)) => Arc::clone(s),
            Some(other) => {
                return Err(malformed(
                    None,
                    format!("'id' must be a string, found {}", other.type_name()),
                ));
            }
            None => return Err(malformed(None, "missing 'id'".to_string())),
        };

        let kind = match doc.get("op") {
            Some(Document::String(tag)) => OpKind::parse(tag)
                .ok_or_else(|| malformed(Some(&*id), format!("unknown op '{tag}'")))?,
            Some(other) => {
                return Err(malformed(
                    Some(&*id),
                    format!("'op' must be a string, found {}", other.type_name()),
                ));
            }
            None => return Err(malformed(Some(&*id), "missing 'op'".to_string())),
        };

        let position = match doc.get("position") {
            None => None,
            Some(_) if addressing.layout == CollectionLayout::Keyed => {
                return Err(malformed(
                    Some(&*id),
                    format!("'position' is not supported for {} documents", addressing.name),
                ));
            }
            Some(value) => {
                let index = value.as_i64().and_then(|n| usize::try_from(n).ok());
                Some(index.ok_or_else(|| {
                    malformed(
                        Some(&*id),
                        format!("'position' must be a non-negative integer, found {value}"),
                    )
                })?)
            }
        };

        let fields = match kind {
            OpKind::Remove => DocObject::new(),
            OpKind::Add | OpKind::Override => {
                let mut fields = match doc.get("node") {
                    Some(Document::Object(fields)) => fields.clone(),
                    Some(other) => {
                        return Err(malformed(
                            Some(&*id),
                            format!("'node' must be an object, found {}", other.type_name()),
                        ));
                    }
                    None => return Err(malformed(Some(&*id), format!("{kind} requires 'node'"))),
                };

                if let Some(id_field) = addressing.id_field() {
                    match fields.get(id_field).cloned() {
                        Some(Document::String(own)) if *own == *id => {}
                        Some(other) => {
                            return Err(malformed(
                                Some(&*id),
                                format!("node '{id_field}' {other} disagrees with entry id"),
                            ));
                        }
                        None if kind == OpKind::Add => {
                            fields = fields.insert(id_field.into(), Document::String(Arc::clone(&id)));
                        }
                        None => {}
                    }
                }

                if let Some(parent) = doc.get("parentId") {
                    let Some(parent_field) = addressing.parent_field() else {
                        return Err(malformed(
                            Some(&*id),
                            format!("'parentId' is not supported for {} documents", addressing.name),
                        ));
                    };
                    if let Some(own) = fields.get(parent_field).filter(|own| *own != parent) {
                        return Err(malformed(
                            Some(&*id),
                            format!("entry 'parentId' {parent} disagrees with node '{parent_field}' {own}"),
                        ));
                    }
                    fields = fields.insert(parent_field.into(), parent.clone());
                }

                fields
            }
        };

        Ok(Self {
            kind,
            id,
            fields,
            position,
            entry,
        })
    }
}

/// An ordered, contradiction-free list of patch operations.
#[derive(Clone, Debug, Default)]
pub struct PatchPlan {
    ops: Vec<PatchOp>,
}

impl PatchPlan {
    /// Checks `ops` for ambiguous addressing.
    ///
    /// A node may be added at most once, may not be both removed and
    /// added/overridden, and two overrides may not write different values to
    /// the same field. Repeated removes and add-then-override are allowed.
    ///
    /// # Errors
    ///
    /// Returns a patch error naming the first contradictory entry.
    pub fn new(ops: Vec<PatchOp>) -> Result<Self> {
        check_addressing(&ops)?;
        Ok(Self { ops })
    }

    /// Parses and validates the `patch` array of a patch document.
    ///
    /// A document without a `patch` field yields an empty plan.
    ///
    /// # Errors
    ///
    /// Returns a patch error if `patch` is not an array, an entry is
    /// malformed, or entries contradict each other.
    pub fn from_document(patch: &Document, addressing: &Addressing) -> Result<Self> {
        let entries = match patch.get("patch") {
            None => return Ok(Self::default()),
            Some(Document::Array(entries)) => entries,
            Some(other) => {
                return Err(Error::patch(
                    None,
                    format!("'patch' must be an array, found {}", other.type_name()),
                ));
            }
        };

        let ops = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| PatchOp::parse(entry, i, addressing))
            .collect::<Result<Vec<_>>>()?;
        Self::new(ops)
    }

    /// The operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if the plan has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(Default)]
struct Seen {
    added: bool,
    overridden: bool,
    removed: bool,
}

fn check_addressing(ops: &[PatchOp]) -> Result<()> {
    let mut seen: HashMap<&str, Seen> = HashMap::new();
    let mut writes: HashMap<(&str, &str), &Document> = HashMap::new();

    for op in ops {
        let state = seen.entry(&*op.id).or_default();
        let conflict = match op.kind {
            OpKind::Add if state.added => Some("node is added twice"),
            OpKind::Add | OpKind::Override if state.removed => {
                Some("node is both removed and written")
            }
            OpKind::Remove if state.added || state.overridden => {
                Some("node is both written and removed")
            }
            _ => None,
        };
        if let Some(message) = conflict {
            return Err(Error::patch(
                Some(&*op.id),
                format!("entry {}: ambiguous addressing, {message}", op.entry),
            ));
        }

        match op.kind {
            OpKind::Add => state.added = true,
            OpKind::Remove => state.removed = true,
            OpKind::Override => {
                state.overridden = true;
                for (field, value) in op.fields.iter() {
                    let previous = writes.insert((&*op.id, &**field), value);
                    if let Some(previous) = previous.filter(|previous| *previous != value) {
                        return Err(Error::patch(
                            Some(&*op.id),
                            format!(
                                "entry {}: ambiguous addressing, field '{field}' overridden with {previous} and {value}",
                                op.entry
                            ),
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}
