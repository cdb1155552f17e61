//! TextGlass - Data-driven text classification
//!
//! This crate re-exports all layers of the TextGlass system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: textglass_runtime    - Domain files, fixtures, REPL, CLI
//! Layer 3: textglass_engine     - Pattern matching, attribute resolution, reload
//! Layer 2: textglass_transform  - Input transformers and pipelines
//!          textglass_patch      - Base/patch document merging
//! Layer 1: textglass_foundation - Documents, domain headers, errors
//! ```

pub use textglass_engine as engine;
pub use textglass_foundation as foundation;
pub use textglass_patch as patch;
pub use textglass_runtime as runtime;
pub use textglass_transform as transform;
