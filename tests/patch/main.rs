//! Integration tests for Layer 2: Patch
//!
//! Tests for patch parsing, addressing checks, and merging.

mod merging;
mod plans;
mod properties;
