//! Domain loading and classification.
//!
//! Loading merges each base document with its optional patch, builds the
//! input pipeline and both stores, and only then yields an engine. A built
//! engine is immutable, so `classify` needs no locking.

use serde::Serialize;
use textglass_foundation::{Document, DocumentHeader, DocumentKind, DomainId, Error, Result};
use textglass_patch::PatchMerger;
use textglass_transform::{TransformerPipeline, TransformerRegistry};
use tracing::{info, trace};

use crate::attribute::{AttributeStore, Attributes};
use crate::config::EngineConfig;
use crate::pattern::{PATTERN_ID, PatternStore};

const INPUT_TRANSFORMERS_PATH: [&str; 2] = ["inputParser", "transformers"];

// =============================================================================
// Classification Result
// =============================================================================

/// Outcome of classifying one input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// The winning pattern, if any.
    pub pattern_id: Option<String>,
    /// Resolved attributes; empty when nothing matched.
    pub attributes: Attributes,
}

impl ClassificationResult {
    /// Returns true if a pattern was selected.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.pattern_id.is_some()
    }

    /// The winning pattern id.
    #[must_use]
    pub fn pattern_id(&self) -> Option<&str> {
        self.pattern_id.as_deref()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// The documents making up one domain load.
#[derive(Clone, Copy, Debug)]
pub struct DomainSources<'a> {
    /// Base pattern document (required).
    pub patterns: &'a Document,
    /// Pattern patch document.
    pub pattern_patch: Option<&'a Document>,
    /// Base attribute document.
    pub attributes: Option<&'a Document>,
    /// Attribute patch document.
    pub attribute_patch: Option<&'a Document>,
}

impl<'a> DomainSources<'a> {
    /// Sources with only a base pattern document.
    #[must_use]
    pub fn new(patterns: &'a Document) -> Self {
        Self {
            patterns,
            pattern_patch: None,
            attributes: None,
            attribute_patch: None,
        }
    }

    /// Builder method to set the pattern patch.
    #[must_use]
    pub fn with_pattern_patch(mut self, patch: Option<&'a Document>) -> Self {
        self.pattern_patch = patch;
        self
    }

    /// Builder method to set the base attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Option<&'a Document>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method to set the attribute patch.
    #[must_use]
    pub fn with_attribute_patch(mut self, patch: Option<&'a Document>) -> Self {
        self.attribute_patch = patch;
        self
    }
}

/// Builds engines with a given configuration and transformer registry.
#[derive(Clone, Debug)]
pub struct EngineLoader {
    config: EngineConfig,
    registry: TransformerRegistry,
}

impl Default for EngineLoader {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            registry: TransformerRegistry::standard(),
        }
    }
}

impl EngineLoader {
    /// Creates a loader with the default configuration and built-in transformers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder method to set the transformer registry.
    #[must_use]
    pub fn with_registry(mut self, registry: TransformerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The transformer registry in use.
    #[must_use]
    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Loads a domain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` for a document of the wrong type,
    /// `DomainMismatch` if the documents disagree on domain identity, and the
    /// patch, transformer, pattern, or attribute errors raised while merging
    /// and building.
    pub fn load(&self, sources: &DomainSources<'_>) -> Result<ClassificationEngine> {
        let domain = DocumentHeader::read(sources.patterns, DocumentKind::Pattern)?.domain;
        check_header(sources.pattern_patch, DocumentKind::PatternPatch, &domain)?;
        check_header(sources.attributes, DocumentKind::Attribute, &domain)?;
        check_header(sources.attribute_patch, DocumentKind::AttributePatch, &domain)?;

        let patterns = PatchMerger::patterns()
            .merge(sources.patterns, sources.pattern_patch)
            .map_err(|e| e.in_source(DocumentKind::PatternPatch.tag()))?;

        let attributes = match (sources.attributes, sources.attribute_patch) {
            (None, None) => None,
            (base, patch) => {
                let empty = Document::empty_object();
                let base = base.unwrap_or(&empty);
                Some(
                    PatchMerger::attributes()
                        .merge(base, patch)
                        .map_err(|e| e.in_source(DocumentKind::AttributePatch.tag()))?,
                )
            }
        };

        let pipeline = input_pipeline(&patterns, &self.registry)?;
        let pattern_store = PatternStore::build(&patterns, &self.config)?;
        let attribute_store =
            AttributeStore::build(attributes.as_ref(), &pattern_store, &self.registry)?;

        info!(
            domain = %domain.name,
            version = %domain.version,
            patterns = pattern_store.len(),
            scopes = attribute_store.scope_count(),
            transformers = pipeline.len(),
            "loaded domain"
        );

        Ok(ClassificationEngine {
            domain,
            config: self.config.clone(),
            pipeline,
            patterns: pattern_store,
            attributes: attribute_store,
            effective_patterns: patterns,
            effective_attributes: attributes,
        })
    }
}

fn check_header(doc: Option<&Document>, kind: DocumentKind, domain: &DomainId) -> Result<()> {
    match doc {
        None => Ok(()),
        Some(doc) => DocumentHeader::read(doc, kind)?.ensure_domain(domain),
    }
}

fn input_pipeline(patterns: &Document, registry: &TransformerRegistry) -> Result<TransformerPipeline> {
    match patterns.get_path(&INPUT_TRANSFORMERS_PATH) {
        None | Some(Document::Null) => Ok(TransformerPipeline::new()),
        Some(Document::Array(configs)) => TransformerPipeline::build(configs, registry),
        Some(other) => Err(Error::transformer_config(
            "inputParser",
            "transformers",
            format!("must be an array, found {}", other.type_name()),
        )),
    }
}

// =============================================================================
// Classification Engine
// =============================================================================

/// A loaded, immutable domain ready to classify input.
#[derive(Clone, Debug)]
pub struct ClassificationEngine {
    domain: DomainId,
    config: EngineConfig,
    pipeline: TransformerPipeline,
    patterns: PatternStore,
    attributes: AttributeStore,
    effective_patterns: Document,
    effective_attributes: Option<Document>,
}

impl ClassificationEngine {
    /// Loads a domain with the default configuration and built-in transformers.
    ///
    /// # Errors
    ///
    /// See [`EngineLoader::load`].
    pub fn load(
        patterns: &Document,
        pattern_patch: Option<&Document>,
        attributes: Option<&Document>,
        attribute_patch: Option<&Document>,
    ) -> Result<Self> {
        let sources = DomainSources::new(patterns)
            .with_pattern_patch(pattern_patch)
            .with_attributes(attributes)
            .with_attribute_patch(attribute_patch);
        EngineLoader::new().load(&sources)
    }

    /// Classifies `input`.
    ///
    /// The input pipeline runs first; the winning pattern (or the default
    /// pattern) selects the attributes, and derived attributes see the
    /// original input.
    #[must_use]
    pub fn classify(&self, input: &str) -> ClassificationResult {
        let transformed = self.pipeline.apply(input);
        let matched = self.patterns.match_text(&transformed);
        let winner = matched.or_else(|| self.patterns.default_id());

        let mut attributes = self.attributes.resolve(winner, input);
        if self.config.include_pattern_id {
            if let Some(id) = winner {
                attributes.insert(PATTERN_ID, id);
            }
        }

        trace!(
            input,
            transformed = %transformed,
            pattern = winner.unwrap_or("-"),
            defaulted = matched.is_none() && winner.is_some(),
            "classified input"
        );

        ClassificationResult {
            pattern_id: winner.map(str::to_string),
            attributes,
        }
    }

    /// The domain name.
    #[must_use]
    pub fn domain_name(&self) -> &str {
        &self.domain.name
    }

    /// The domain version.
    #[must_use]
    pub fn domain_version(&self) -> &str {
        &self.domain.version
    }

    /// The domain identity.
    #[must_use]
    pub fn domain(&self) -> &DomainId {
        &self.domain
    }

    /// The configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The compiled patterns.
    #[must_use]
    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    /// The precomputed attributes.
    #[must_use]
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// The input pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &TransformerPipeline {
        &self.pipeline
    }

    /// The pattern document after patching.
    #[must_use]
    pub fn effective_patterns(&self) -> &Document {
        &self.effective_patterns
    }

    /// The attribute document after patching, if any was supplied.
    #[must_use]
    pub fn effective_attributes(&self) -> Option<&Document> {
        self.effective_attributes.as_ref()
    }
}
