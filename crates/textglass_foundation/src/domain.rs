//! Domain identity and document headers.
//!
//! Every document a domain is built from declares which kind of document it
//! is and which `(domain, domainVersion)` it belongs to.

use std::fmt;

use crate::document::Document;
use crate::error::{Error, Result};

/// Identity of a domain: its name and version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId {
    /// Domain name.
    pub name: String,
    /// Domain version.
    pub version: String,
}

impl DomainId {
    /// Creates a domain identity.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// The kinds of document a domain load consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Base pattern definitions.
    Pattern,
    /// Base attribute definitions.
    Attribute,
    /// Patch over pattern definitions.
    PatternPatch,
    /// Patch over attribute definitions.
    AttributePatch,
    /// Test fixture cases.
    Test,
}

impl DocumentKind {
    /// The value of the `type` header field for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Attribute => "attribute",
            Self::PatternPatch => "patternPatch",
            Self::AttributePatch => "attributePatch",
            Self::Test => "test",
        }
    }

    /// Parses a `type` header value.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        [
            Self::Pattern,
            Self::Attribute,
            Self::PatternPatch,
            Self::AttributePatch,
            Self::Test,
        ]
        .into_iter()
        .find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Parsed `type` / `domain` / `domainVersion` header of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Declared document kind.
    pub kind: DocumentKind,
    /// Declared domain identity.
    pub domain: DomainId,
}

impl DocumentHeader {
    /// Field holding the document kind.
    pub const TYPE: &'static str = "type";
    /// Field holding the domain name.
    pub const DOMAIN: &'static str = "domain";
    /// Field holding the domain version.
    pub const DOMAIN_VERSION: &'static str = "domainVersion";

    /// Reads the header of `doc`, requiring it to be of kind `expected`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if the document is not an object, declares a
    /// different kind, or lacks a domain name or version.
    pub fn read(doc: &Document, expected: DocumentKind) -> Result<Self> {
        let label = expected.tag();
        if !doc.is_object() {
            return Err(Error::invalid_document(
                label,
                format!("expected an object, found {}", doc.type_name()),
            ));
        }

        let tag = doc
            .get(Self::TYPE)
            .and_then(Document::as_str)
            .ok_or_else(|| Error::invalid_document(label, "missing 'type'"))?;
        let kind = DocumentKind::from_tag(tag)
            .ok_or_else(|| Error::invalid_document(label, format!("unknown type '{tag}'")))?;
        if kind != expected {
            return Err(Error::invalid_document(
                label,
                format!("expected type '{label}', found '{tag}'"),
            ));
        }

        let name = doc
            .get(Self::DOMAIN)
            .and_then(Document::scalar_text)
            .ok_or_else(|| Error::invalid_document(label, "missing 'domain'"))?;
        let version = doc
            .get(Self::DOMAIN_VERSION)
            .and_then(Document::scalar_text)
            .ok_or_else(|| Error::invalid_document(label, "missing 'domainVersion'"))?;

        Ok(Self {
            kind,
            domain: DomainId::new(name, version),
        })
    }

    /// Checks that this header belongs to `expected`.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if the name or version differ.
    pub fn ensure_domain(&self, expected: &DomainId) -> Result<()> {
        if &self.domain == expected {
            Ok(())
        } else {
            Err(Error::domain_mismatch(
                self.kind.tag(),
                expected.to_string(),
                self.domain.to_string(),
            ))
        }
    }

    /// Returns true if `field` is one of the header fields.
    #[must_use]
    pub fn is_header_field(field: &str) -> bool {
        matches!(field, Self::TYPE | Self::DOMAIN | Self::DOMAIN_VERSION)
    }
}
