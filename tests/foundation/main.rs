//! Integration tests for Layer 1: Foundation
//!
//! Tests for documents, domain headers, and errors.

mod errors;
