//! Shared engine handle with atomic reload.
//!
//! Readers take an `Arc` snapshot under a brief read lock and classify against
//! it without holding the lock. A reload builds the replacement completely
//! before swapping it in, so a classify call sees either the old domain or
//! the new one, never a mixture.

use std::sync::{Arc, PoisonError, RwLock};

use textglass_foundation::Result;
use tracing::{info, warn};

use crate::engine::{ClassificationEngine, ClassificationResult, DomainSources, EngineLoader};

/// A cloneable, thread-safe reference to the current engine.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    current: Arc<RwLock<Arc<ClassificationEngine>>>,
}

impl EngineHandle {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: ClassificationEngine) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    /// Returns the current engine.
    ///
    /// The snapshot stays valid after a reload.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ClassificationEngine> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Classifies `input` against a single snapshot.
    #[must_use]
    pub fn classify(&self, input: &str) -> ClassificationResult {
        self.snapshot().classify(input)
    }

    /// Swaps in `engine`, returning the previous one.
    pub fn replace(&self, engine: ClassificationEngine) -> Arc<ClassificationEngine> {
        let next = Arc::new(engine);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Loads `sources` and swaps the result in.
    ///
    /// # Errors
    ///
    /// Returns the load error; the current engine stays in place.
    pub fn reload(&self, loader: &EngineLoader, sources: &DomainSources<'_>) -> Result<()> {
        match loader.load(sources) {
            Ok(engine) => {
                let domain = engine.domain_name().to_string();
                let version = engine.domain_version().to_string();
                let previous = self.replace(engine);
                info!(
                    domain = %domain,
                    from = previous.domain_version(),
                    to = %version,
                    "reloaded domain"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "reload failed, keeping current domain");
                Err(e)
            }
        }
    }
}

impl From<ClassificationEngine> for EngineHandle {
    fn from(engine: ClassificationEngine) -> Self {
        Self::new(engine)
    }
}
