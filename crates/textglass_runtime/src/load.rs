//! Reading domain documents from disk.
//!
//! A domain directory holds up to five JSON files with fixed names; only the
//! base pattern document is required.

use std::fs;
use std::path::{Path, PathBuf};

use textglass_engine::{ClassificationEngine, DomainSources, EngineLoader};
use textglass_foundation::{Document, Error, ErrorKind, Result};
use tracing::debug;

/// Base pattern document.
pub const PATTERNS_FILE: &str = "patterns.json";
/// Pattern patch document.
pub const PATTERN_PATCH_FILE: &str = "patterns_patch.json";
/// Base attribute document.
pub const ATTRIBUTES_FILE: &str = "attributes.json";
/// Attribute patch document.
pub const ATTRIBUTE_PATCH_FILE: &str = "attributes_patch.json";
/// Test fixture document.
pub const TEST_FILE: &str = "test.json";

/// Parses JSON text into a document.
///
/// # Errors
///
/// Returns a JSON error if the text is not valid JSON.
pub fn parse_document(text: &str) -> Result<Document> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Document::from)
        .map_err(|e| Error::new(ErrorKind::JsonError(e.to_string())))
}

/// Reads and parses a JSON document.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a JSON error naming
/// the file if it does not parse.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read '{}': {e}",
            path.display()
        )))
    })?;
    let doc = parse_document(&text).map_err(|e| e.in_source(path.display().to_string()))?;
    debug!(path = %path.display(), "read document");
    Ok(doc)
}

// =============================================================================
// Domain Files
// =============================================================================

/// The files of one domain directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainFiles {
    /// The directory the files were found in.
    pub dir: PathBuf,
    /// Base pattern document.
    pub patterns: PathBuf,
    /// Pattern patch document, if present.
    pub pattern_patch: Option<PathBuf>,
    /// Base attribute document, if present.
    pub attributes: Option<PathBuf>,
    /// Attribute patch document, if present.
    pub attribute_patch: Option<PathBuf>,
    /// Test fixture document, if present.
    pub test: Option<PathBuf>,
}

impl DomainFiles {
    /// Finds the domain files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `dir` has no `patterns.json`.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let patterns = dir.join(PATTERNS_FILE);
        if !patterns.is_file() {
            return Err(Error::new(ErrorKind::IoError(format!(
                "no {PATTERNS_FILE} in '{}'",
                dir.display()
            ))));
        }

        let optional = |name: &str| Some(dir.join(name)).filter(|path| path.is_file());
        let files = Self {
            pattern_patch: optional(PATTERN_PATCH_FILE),
            attributes: optional(ATTRIBUTES_FILE),
            attribute_patch: optional(ATTRIBUTE_PATCH_FILE),
            test: optional(TEST_FILE),
            patterns,
            dir,
        };
        debug!(
            dir = %files.dir.display(),
            pattern_patch = files.pattern_patch.is_some(),
            attributes = files.attributes.is_some(),
            attribute_patch = files.attribute_patch.is_some(),
            test = files.test.is_some(),
            "discovered domain files"
        );
        Ok(files)
    }

    /// Reads every discovered file.
    ///
    /// # Errors
    ///
    /// Returns the first read or parse error.
    pub fn read(&self) -> Result<DomainDocuments> {
        let read_optional =
            |path: &Option<PathBuf>| path.as_ref().map(read_document).transpose();
        Ok(DomainDocuments {
            patterns: read_document(&self.patterns)?,
            pattern_patch: read_optional(&self.pattern_patch)?,
            attributes: read_optional(&self.attributes)?,
            attribute_patch: read_optional(&self.attribute_patch)?,
            test: read_optional(&self.test)?,
        })
    }
}

/// The parsed documents of one domain directory.
#[derive(Clone, Debug)]
pub struct DomainDocuments {
    /// Base pattern document.
    pub patterns: Document,
    /// Pattern patch document.
    pub pattern_patch: Option<Document>,
    /// Base attribute document.
    pub attributes: Option<Document>,
    /// Attribute patch document.
    pub attribute_patch: Option<Document>,
    /// Test fixture document.
    pub test: Option<Document>,
}

impl DomainDocuments {
    /// The engine inputs.
    #[must_use]
    pub fn sources(&self) -> DomainSources<'_> {
        DomainSources::new(&self.patterns)
            .with_pattern_patch(self.pattern_patch.as_ref())
            .with_attributes(self.attributes.as_ref())
            .with_attribute_patch(self.attribute_patch.as_ref())
    }
}

/// Reads `files` and builds an engine.
///
/// # Errors
///
/// Returns read, parse, or load errors; load errors name the domain
/// directory.
pub fn load_engine(files: &DomainFiles, loader: &EngineLoader) -> Result<ClassificationEngine> {
    let documents = files.read()?;
    loader
        .load(&documents.sources())
        .map_err(|e| e.in_frame(format!("domain '{}'", files.dir.display())))
}
