//! Cross-layer integration tests for TextGlass
//!
//! Tests that domain directories on disk load, classify, and verify
//! end to end.

mod domains;
