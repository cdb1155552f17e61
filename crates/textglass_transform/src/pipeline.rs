//! Ordered transformer pipelines.

use std::sync::Arc;

use textglass_foundation::{Document, Result};
use tracing::trace;

use crate::registry::TransformerRegistry;
use crate::transformer::Transformer;

/// An ordered sequence of configured transformers.
///
/// Cloning is cheap; steps are shared.
#[derive(Clone, Debug, Default)]
pub struct TransformerPipeline {
    steps: Vec<Arc<dyn Transformer>>,
}

impl TransformerPipeline {
    /// Creates an empty pipeline, which passes text through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pipeline from transformer configurations, in order.
    ///
    /// # Errors
    ///
    /// Returns the first `TransformerConfig` error raised by the registry.
    pub fn build<'a>(
        configs: impl IntoIterator<Item = &'a Document>,
        registry: &TransformerRegistry,
    ) -> Result<Self> {
        let steps = configs
            .into_iter()
            .enumerate()
            .map(|(index, config)| registry.build(config, index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Appends a step.
    #[must_use]
    pub fn then(mut self, step: Arc<dyn Transformer>) -> Self {
        self.steps.push(step);
        self
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Runs every step in order.
    ///
    /// A step that is not applicable leaves the text unchanged.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        self.steps
            .iter()
            .fold(input.to_string(), |text, step| match step.transform(&text) {
                Some(next) => next,
                None => {
                    trace!(transformer = step.name(), "step not applicable, skipped");
                    text
                }
            })
    }

    /// Runs every step in order, stopping at the first step that is not
    /// applicable.
    #[must_use]
    pub fn try_apply(&self, input: &str) -> Option<String> {
        self.steps
            .iter()
            .try_fold(input.to_string(), |text, step| step.transform(&text))
    }
}
