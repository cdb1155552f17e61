//! Pattern matching, attribute resolution, and classification for TextGlass.
//!
//! This crate provides:
//! - [`PatternStore`] - Compiled pattern hierarchy with first-match evaluation
//! - [`AttributeStore`] - Precomputed inherited attributes per pattern
//! - [`ClassificationEngine`] - Domain loading and classification
//! - [`EngineHandle`] - Shared engine reference with atomic reload
//! - [`EngineConfig`] - Validation limits and result shape

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attribute;
pub mod config;
pub mod engine;
pub mod handle;
pub mod pattern;

pub use attribute::{
    AttributeStore, AttributeValue, Attributes, DEFAULT_SCOPE, DerivedAttribute,
    ResolvedAttributes,
};
pub use config::EngineConfig;
pub use engine::{ClassificationEngine, ClassificationResult, DomainSources, EngineLoader};
pub use handle::EngineHandle;
pub use pattern::{CompiledPattern, MatchInput, MatchSpec, PathSegment, PatternStore};
