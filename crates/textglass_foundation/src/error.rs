//! Error types for the TextGlass system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every error raised while loading a domain is fatal to that load attempt.

use std::fmt;

use thiserror::Error;

/// The main error type for TextGlass operations.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

fn context_suffix(context: &Option<ErrorContext>) -> String {
    match context {
        Some(ctx) if ctx.source.is_some() || !ctx.stack.is_empty() => format!(" ({ctx})"),
        _ => String::new(),
    }
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the source document on this error, keeping any existing frames.
    #[must_use]
    pub fn in_source(mut self, source: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_source(source));
        self
    }

    /// Adds a frame describing what was being processed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a malformed or contradictory patch error.
    #[must_use]
    pub fn patch(target: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Patch {
            target: target.map(str::to_string),
            message: message.into(),
        })
    }

    /// Creates a pattern definition error.
    #[must_use]
    pub fn pattern_definition(pattern_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PatternDefinition {
            pattern_id: pattern_id.map(str::to_string),
            message: message.into(),
        })
    }

    /// Creates an attribute definition error.
    #[must_use]
    pub fn attribute_definition(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeDefinition {
            scope: scope.into(),
            message: message.into(),
        })
    }

    /// Creates a transformer configuration error naming the offending parameter.
    #[must_use]
    pub fn transformer_config(
        transformer: impl Into<String>,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::TransformerConfig {
            transformer: transformer.into(),
            parameter: parameter.into(),
            message: message.into(),
        })
    }

    /// Creates a domain identity mismatch error.
    #[must_use]
    pub fn domain_mismatch(
        document: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DomainMismatch {
            document: document.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates an invalid document error.
    #[must_use]
    pub fn invalid_document(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDocument {
            document: document.into(),
            message: message.into(),
        })
    }

    /// Returns true if this is a patch error.
    #[must_use]
    pub fn is_patch(&self) -> bool {
        matches!(self.kind, ErrorKind::Patch { .. })
    }

    /// Returns true if this is a pattern definition error.
    #[must_use]
    pub fn is_pattern_definition(&self) -> bool {
        matches!(self.kind, ErrorKind::PatternDefinition { .. })
    }

    /// Returns true if this is an attribute definition error.
    #[must_use]
    pub fn is_attribute_definition(&self) -> bool {
        matches!(self.kind, ErrorKind::AttributeDefinition { .. })
    }

    /// Returns true if this is a transformer configuration error.
    #[must_use]
    pub fn is_transformer_config(&self) -> bool {
        matches!(self.kind, ErrorKind::TransformerConfig { .. })
    }

    /// Returns true if this is a domain mismatch error.
    #[must_use]
    pub fn is_domain_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::DomainMismatch { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed or contradictory patch document.
    #[error("patch error{}: {message}", target_suffix(.target))]
    Patch {
        /// The node identifier the failing operation addressed, if known.
        target: Option<String>,
        /// Description of the failure.
        message: String,
    },

    /// Invalid pattern definition (duplicate id, bad match spec, bad hierarchy).
    #[error("pattern definition error{}: {message}", target_suffix(.pattern_id))]
    PatternDefinition {
        /// The pattern involved, if known.
        pattern_id: Option<String>,
        /// Description of the failure.
        message: String,
    },

    /// Invalid attribute definition (dangling scope, bad value).
    #[error("attribute definition error in scope '{scope}': {message}")]
    AttributeDefinition {
        /// The attribute scope (`*` or a pattern id).
        scope: String,
        /// Description of the failure.
        message: String,
    },

    /// Missing or invalid transformer parameter.
    #[error("transformer config error in {transformer}, parameter '{parameter}': {message}")]
    TransformerConfig {
        /// The transformer type tag (or position when the tag is missing).
        transformer: String,
        /// The missing or invalid parameter.
        parameter: String,
        /// Description of the failure.
        message: String,
    },

    /// Domain name or version disagreement across the documents of one load.
    #[error("domain mismatch in {document}: expected {expected}, found {found}")]
    DomainMismatch {
        /// The document that disagreed.
        document: String,
        /// The identity established by the pattern document.
        expected: String,
        /// The identity the document declared.
        found: String,
    },

    /// Document has the wrong type or shape.
    #[error("invalid {document} document: {message}")]
    InvalidDocument {
        /// Which document was invalid.
        document: String,
        /// Description of the failure.
        message: String,
    },

    /// I/O error while reading domain data.
    #[error("I/O error: {0}")]
    IoError(String),

    /// JSON decoding error while reading domain data.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn target_suffix(target: &Option<String>) -> String {
    target
        .as_deref()
        .map(|t| format!(" at '{t}'"))
        .unwrap_or_default()
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or document name.
    pub source: Option<String>,
    /// Chain of enclosing operations, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            separator = " ";
        }
        for frame in &self.stack {
            write!(f, "{separator}in {frame}")?;
            separator = " ";
        }
        Ok(())
    }
}

/// Result alias used throughout TextGlass.
pub type Result<T> = std::result::Result<T, Error>;
