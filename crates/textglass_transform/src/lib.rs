//! Text transformers for TextGlass.
//!
//! This crate provides:
//! - [`Transformer`] - The capability every text step implements
//! - [`TransformerRegistry`] - Type tag to constructor lookup
//! - [`TransformerPipeline`] - An ordered sequence of configured steps
//!
//! Built-in transformers live in [`transformer`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod pipeline;
pub mod registry;
pub mod transformer;

pub use pipeline::TransformerPipeline;
pub use registry::{Constructor, TransformerRegistry};
pub use transformer::{Params, Transformer};
