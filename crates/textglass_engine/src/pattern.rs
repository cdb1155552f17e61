//! Pattern compilation and hierarchical first-match evaluation.
//!
//! The effective pattern document is compiled once into a [`PatternStore`]:
//! a flat arena of [`CompiledPattern`]s linked into a forest through
//! `parentId`. Matching walks the forest depth-first in declared order and
//! only a pattern without children can win.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use textglass_foundation::{Document, Error, Result};
use tracing::debug;

use crate::config::EngineConfig;

/// Field holding a pattern's identifier.
pub const PATTERN_ID: &str = "patternId";
/// Field holding a pattern's parent identifier.
pub const PARENT_ID: &str = "parentId";
/// Field holding a pattern's match specification.
pub const MATCH: &str = "match";

const PATTERNS_PATH: [&str; 2] = ["patternSet", "patterns"];
const DEFAULT_ID_PATH: [&str; 2] = ["patternSet", "defaultId"];
const SEPARATORS_PATH: [&str; 2] = ["inputParser", "tokenSeparators"];

// =============================================================================
// Match Specifications
// =============================================================================

/// One segment of a path match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// `*`: any single segment.
    Any,
    /// A segment that must be equal.
    Exact(String),
}

impl PathSegment {
    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == segment,
        }
    }
}

/// When a pattern is satisfied by the transformed input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchSpec {
    /// Text equals the value.
    Literal(String),
    /// Text starts with the value.
    Prefix(String),
    /// Text ends with the value.
    Suffix(String),
    /// Value occurs in the text.
    Contains(String),
    /// Every token occurs among the input tokens (as a subsequence when ordered).
    Tokens {
        /// Required tokens.
        tokens: Vec<String>,
        /// Whether the tokens must appear in this order.
        ordered: bool,
    },
    /// Text split on `separator` matches the segments one to one.
    Path {
        /// Expected segments.
        segments: Vec<PathSegment>,
        /// Segment separator.
        separator: String,
    },
}

impl MatchSpec {
    /// Parses a match specification for the pattern `pattern_id`.
    ///
    /// # Errors
    ///
    /// Returns `PatternDefinition` for an unknown `type` or missing or
    /// ill-typed fields.
    pub fn parse(doc: &Document, pattern_id: &str) -> Result<Self> {
        let fail = |message: String| Error::pattern_definition(Some(pattern_id), message);

        if !doc.is_object() {
            return Err(fail(format!(
                "'match' must be an object, found {}",
                doc.type_name()
            )));
        }

        let kind = doc
            .get("type")
            .and_then(Document::as_str)
            .ok_or_else(|| fail("'match' needs a string 'type'".to_string()))?;

        let string_field = |field: &str| -> Result<String> {
            doc.get(field)
                .and_then(Document::as_str)
                .map(str::to_string)
                .ok_or_else(|| fail(format!("'{kind}' match needs a string '{field}'")))
        };

        let string_list = |field: &str| -> Result<Vec<String>> {
            let items = doc
                .get(field)
                .and_then(Document::as_array)
                .ok_or_else(|| fail(format!("'{kind}' match needs an array '{field}'")))?;
            if items.is_empty() {
                return Err(fail(format!("'{kind}' match has an empty '{field}'")));
            }
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| fail(format!("'{field}' entries must be strings")))
                })
                .collect()
        };

        match kind {
            "literal" => Ok(Self::Literal(string_field("value")?)),
            "prefix" => Ok(Self::Prefix(string_field("value")?)),
            "suffix" => Ok(Self::Suffix(string_field("value")?)),
            "contains" => Ok(Self::Contains(string_field("value")?)),
            "tokens" => {
                let ordered = match doc.get("ordered") {
                    None => false,
                    Some(value) => value
                        .as_bool()
                        .ok_or_else(|| fail("'ordered' must be a boolean".to_string()))?,
                };
                Ok(Self::Tokens {
                    tokens: string_list("tokens")?,
                    ordered,
                })
            }
            "path" => {
                let separator = match doc.get("separator") {
                    None => "/".to_string(),
                    Some(_) => string_field("separator")?,
                };
                if separator.is_empty() {
                    return Err(fail("'separator' must not be empty".to_string()));
                }
                let segments = string_list("segments")?
                    .into_iter()
                    .map(|s| {
                        if s == "*" {
                            PathSegment::Any
                        } else {
                            PathSegment::Exact(s)
                        }
                    })
                    .collect();
                Ok(Self::Path {
                    segments,
                    separator,
                })
            }
            other => Err(fail(format!("unknown match type '{other}'"))),
        }
    }

    /// Returns true if `input` satisfies this specification.
    #[must_use]
    pub fn matches(&self, input: &MatchInput<'_>) -> bool {
        let text = input.text();
        match self {
            Self::Literal(value) => text == value,
            Self::Prefix(value) => text.starts_with(value.as_str()),
            Self::Suffix(value) => text.ends_with(value.as_str()),
            Self::Contains(value) => text.contains(value.as_str()),
            Self::Tokens {
                tokens,
                ordered: false,
            } => {
                let available = input.tokens();
                tokens.iter().all(|t| available.contains(&t.as_str()))
            }
            Self::Tokens {
                tokens,
                ordered: true,
            } => {
                let mut available = input.tokens().iter();
                tokens
                    .iter()
                    .all(|t| available.any(|candidate| *candidate == t.as_str()))
            }
            Self::Path {
                segments,
                separator,
            } => {
                let parts: Vec<&str> = text.split(separator.as_str()).collect();
                parts.len() == segments.len()
                    && segments.iter().zip(parts).all(|(spec, part)| spec.matches(part))
            }
        }
    }
}

/// Transformed input text, tokenized on first use.
#[derive(Debug)]
pub struct MatchInput<'a> {
    text: &'a str,
    separators: &'a [String],
    tokens: OnceCell<Vec<&'a str>>,
}

impl<'a> MatchInput<'a> {
    /// Wraps `text` for matching with the given token separators.
    #[must_use]
    pub fn new(text: &'a str, separators: &'a [String]) -> Self {
        Self {
            text,
            separators,
            tokens: OnceCell::new(),
        }
    }

    /// The transformed text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The non-empty tokens of the text.
    pub fn tokens(&self) -> &[&'a str] {
        self.tokens.get_or_init(|| tokenize(self.text, self.separators))
    }
}

/// Splits `text` on every separator, dropping empty tokens.
#[must_use]
pub fn tokenize<'a>(text: &'a str, separators: &[String]) -> Vec<&'a str> {
    let mut tokens = vec![text];
    for separator in separators.iter().filter(|s| !s.is_empty()) {
        tokens = tokens
            .into_iter()
            .flat_map(|token| token.split(separator.as_str()))
            .collect();
    }
    tokens.retain(|token| !token.is_empty());
    tokens
}

// =============================================================================
// Compiled Patterns
// =============================================================================

/// A pattern ready for evaluation.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    /// Unique identifier.
    pub id: Arc<str>,
    /// Index of the parent in the store, if any.
    pub parent: Option<usize>,
    /// Match specification; `None` for a group.
    pub spec: Option<MatchSpec>,
    /// Child indices in declared order.
    pub children: Vec<usize>,
    /// Nesting depth; roots have depth 1.
    pub depth: usize,
}

impl CompiledPattern {
    /// Returns true if this pattern is a group (it never wins by itself).
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.spec.is_none()
    }
}

// =============================================================================
// Pattern Store
// =============================================================================

/// The compiled pattern forest of one domain.
#[derive(Clone, Debug, Default)]
pub struct PatternStore {
    patterns: Vec<CompiledPattern>,
    index: HashMap<Arc<str>, usize>,
    roots: Vec<usize>,
    default: Option<usize>,
    separators: Vec<String>,
}

/// A declared pattern before linking.
struct Declared {
    id: Arc<str>,
    parent: Option<Arc<str>>,
    spec: Option<MatchSpec>,
}

impl PatternStore {
    /// Compiles the effective pattern document.
    ///
    /// # Errors
    ///
    /// Returns `PatternDefinition` on a missing or duplicate `patternId`, an
    /// invalid match specification, a dangling or cyclic `parentId`, a
    /// hierarchy deeper than the configured limit, or a `defaultId` naming no
    /// pattern.
    pub fn build(effective: &Document, config: &EngineConfig) -> Result<Self> {
        let declared = match effective.get_path(&PATTERNS_PATH) {
            None => Vec::new(),
            Some(Document::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(position, entry)| declare(entry, position))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::pattern_definition(
                    None,
                    format!("'patternSet.patterns' must be an array, found {}", other.type_name()),
                ));
            }
        };

        let mut index = HashMap::with_capacity(declared.len());
        for (i, pattern) in declared.iter().enumerate() {
            if index.insert(Arc::clone(&pattern.id), i).is_some() {
                return Err(Error::pattern_definition(
                    Some(&*pattern.id),
                    "duplicate patternId",
                ));
            }
        }

        let mut patterns: Vec<CompiledPattern> = Vec::with_capacity(declared.len());
        for pattern in &declared {
            let parent = match &pattern.parent {
                None => None,
                Some(parent) => Some(*index.get(parent).ok_or_else(|| {
                    Error::pattern_definition(
                        Some(&*pattern.id),
                        format!("parentId '{parent}' names no pattern"),
                    )
                })?),
            };
            patterns.push(CompiledPattern {
                id: Arc::clone(&pattern.id),
                parent,
                spec: pattern.spec.clone(),
                children: Vec::new(),
                depth: 0,
            });
        }

        for i in 0..patterns.len() {
            let depth = depth_of(&patterns, i, config.max_hierarchy_depth)?;
            patterns[i].depth = depth;
        }

        let mut roots = Vec::new();
        for i in 0..patterns.len() {
            match patterns[i].parent {
                Some(parent) => patterns[parent].children.push(i),
                None => roots.push(i),
            }
        }

        let default = match effective.get_path(&DEFAULT_ID_PATH) {
            None | Some(Document::Null) => None,
            Some(Document::String(id)) => Some(*index.get(&**id).ok_or_else(|| {
                Error::pattern_definition(Some(&**id), "defaultId names no pattern")
            })?),
            Some(other) => {
                return Err(Error::pattern_definition(
                    None,
                    format!("'defaultId' must be a string, found {}", other.type_name()),
                ));
            }
        };

        let separators = token_separators(effective, config)?;

        debug!(
            patterns = patterns.len(),
            roots = roots.len(),
            groups = patterns.iter().filter(|p| p.is_group()).count(),
            "compiled pattern store"
        );

        Ok(Self {
            patterns,
            index,
            roots,
            default,
            separators,
        })
    }

    /// Returns the id of the first winning pattern for the transformed `text`.
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<&str> {
        let input = MatchInput::new(text, &self.separators);
        self.roots
            .iter()
            .find_map(|&root| self.evaluate(root, &input))
            .map(|winner| &*self.patterns[winner].id)
    }

    fn evaluate(&self, index: usize, input: &MatchInput<'_>) -> Option<usize> {
        let pattern = &self.patterns[index];
        if let Some(spec) = &pattern.spec {
            if !spec.matches(input) {
                return None;
            }
        }
        if pattern.children.is_empty() {
            // Only satisfied leaves win; a childless group matches nothing.
            return pattern.spec.as_ref().map(|_| index);
        }
        pattern
            .children
            .iter()
            .find_map(|&child| self.evaluate(child, input))
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks if a pattern with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up a compiled pattern.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CompiledPattern> {
        self.index.get(id).map(|&i| &self.patterns[i])
    }

    /// Returns every pattern id in declared order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| &*p.id)
    }

    /// Returns the parent id of `id`, if it has one.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(|p| p.parent)
            .map(|parent| &*self.patterns[parent].id)
    }

    /// Returns the ids from the root down to `id`, or `None` for an unknown id.
    #[must_use]
    pub fn hierarchy_path(&self, id: &str) -> Option<Vec<&str>> {
        let mut current = self.index.get(id).copied();
        let mut path = Vec::new();
        while let Some(i) = current {
            path.push(&*self.patterns[i].id);
            current = self.patterns[i].parent;
        }
        if path.is_empty() {
            return None;
        }
        path.reverse();
        Some(path)
    }

    /// The fallback pattern used when nothing matches.
    #[must_use]
    pub fn default_id(&self) -> Option<&str> {
        self.default.map(|i| &*self.patterns[i].id)
    }

    /// Separators used to tokenize input.
    #[must_use]
    pub fn token_separators(&self) -> &[String] {
        &self.separators
    }
}

fn declare(entry: &Document, position: usize) -> Result<Declared> {
    if !entry.is_object() {
        return Err(Error::pattern_definition(
            None,
            format!("pattern #{position} must be an object, found {}", entry.type_name()),
        ));
    }

    let id: Arc<str> = match entry.get(PATTERN_ID) {
        Some(Document::String(id)) if !id.is_empty() => Arc::clone(id),
        _ => {
            return Err(Error::pattern_definition(
                None,
                format!("pattern #{position} has no patternId"),
            ));
        }
    };

    let parent = match entry.get(PARENT_ID) {
        None | Some(Document::Null) => None,
        Some(Document::String(parent)) => Some(Arc::clone(parent)),
        Some(other) => {
            return Err(Error::pattern_definition(
                Some(&*id),
                format!("parentId must be a string, found {}", other.type_name()),
            ));
        }
    };

    let spec = match entry.get(MATCH) {
        None | Some(Document::Null) => None,
        Some(spec) => Some(MatchSpec::parse(spec, &id)?),
    };

    Ok(Declared { id, parent, spec })
}

fn depth_of(patterns: &[CompiledPattern], start: usize, max_depth: usize) -> Result<usize> {
    let mut seen = HashSet::new();
    let mut current = Some(start);
    let mut depth = 0;
    while let Some(i) = current {
        if !seen.insert(i) {
            return Err(Error::pattern_definition(
                Some(&*patterns[start].id),
                "parentId chain is cyclic",
            ));
        }
        depth += 1;
        if depth > max_depth {
            return Err(Error::pattern_definition(
                Some(&*patterns[start].id),
                format!("hierarchy deeper than {max_depth} levels"),
            ));
        }
        current = patterns[i].parent;
    }
    Ok(depth)
}

fn token_separators(effective: &Document, config: &EngineConfig) -> Result<Vec<String>> {
    let declared: Vec<String> = match effective.get_path(&SEPARATORS_PATH) {
        None | Some(Document::Null) => Vec::new(),
        Some(Document::Array(items)) => items
            .iter()
            .map(|item| match item {
                Document::String(s) if !s.is_empty() => Ok(s.to_string()),
                other => Err(Error::pattern_definition(
                    None,
                    format!("token separators must be non-empty strings, found {other}"),
                )),
            })
            .collect::<Result<_>>()?,
        Some(other) => {
            return Err(Error::pattern_definition(
                None,
                format!("'tokenSeparators' must be an array, found {}", other.type_name()),
            ));
        }
    };

    Ok(if declared.is_empty() {
        config.token_separators.clone()
    } else {
        declared
    })
}
