//! Integration tests for Layer 3: Engine
//!
//! Tests for pattern matching, attribute resolution, loading, and reload.

mod loading;
mod matching;
