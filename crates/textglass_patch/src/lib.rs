//! Base/patch merging for TextGlass domain documents.
//!
//! This crate provides:
//! - [`Addressing`] - Where a document keeps its patchable nodes
//! - [`PatchPlan`] - Parsed and validated patch operations
//! - [`PatchMerger`] - Applies a plan to a base document
//!
//! Pattern and attribute documents share one merge algorithm; only their
//! addressing differs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod addressing;
pub mod merge;
pub mod op;

pub use addressing::{Addressing, CollectionLayout};
pub use merge::{PATCH_FIELD, PatchMerger};
pub use op::{OpKind, PatchOp, PatchPlan};

use textglass_foundation::{Document, Result};

/// Merges `patch` into `base` using the given addressing rules.
///
/// # Errors
///
/// See [`PatchMerger::merge`].
pub fn merge(base: &Document, patch: Option<&Document>, addressing: &Addressing) -> Result<Document> {
    PatchMerger::new(*addressing).merge(base, patch)
}
