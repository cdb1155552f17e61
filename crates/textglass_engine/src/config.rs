//! Configuration for building classification engines.

/// Default limit on pattern nesting.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 32;

/// Separator used to tokenize input when neither the document nor the
/// configuration names any.
pub const DEFAULT_TOKEN_SEPARATOR: &str = " ";

/// Configuration for building classification engines.
///
/// Controls validation limits and the shape of classification results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest allowed pattern hierarchy; a root pattern has depth 1.
    pub max_hierarchy_depth: usize,

    /// Token separators used when the pattern document declares none.
    pub token_separators: Vec<String>,

    /// Whether resolved attributes also carry the winning `patternId`.
    pub include_pattern_id: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            token_separators: vec![DEFAULT_TOKEN_SEPARATOR.to_string()],
            include_pattern_id: false,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with tighter validation limits.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_hierarchy_depth: 8,
            ..Self::default()
        }
    }

    /// Builder method to set the hierarchy depth limit.
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    /// Builder method to set the fallback token separators.
    #[must_use]
    pub fn with_token_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to include the pattern id in resolved attributes.
    #[must_use]
    pub fn with_include_pattern_id(mut self, include: bool) -> Self {
        self.include_pattern_id = include;
        self
    }
}
