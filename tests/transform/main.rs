//! Integration tests for Layer 2: Transform
//!
//! Tests for the transformer registry and pipelines.

mod pipelines;
mod registry;
