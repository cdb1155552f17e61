//! The transformer capability and the built-in transformers.
//!
//! A transformer is configured once from its document parameters and is
//! stateless afterwards. [`Transformer::transform`] returns `None` when the
//! step does not apply to the given text (for example an index past the end).

use std::fmt::Debug;

use textglass_foundation::{DocObject, Document, Error, Result};

/// A configured text step.
pub trait Transformer: Send + Sync + Debug {
    /// The type tag this transformer was built from.
    fn name(&self) -> &'static str;

    /// Transforms `input`, or returns `None` if the step is not applicable.
    fn transform(&self, input: &str) -> Option<String>;
}

// =============================================================================
// Parameters
// =============================================================================

/// Parameter access for transformer constructors.
///
/// Distinguishes an absent parameter from one present with an empty value, and
/// reports both as [`TransformerConfig`](textglass_foundation::ErrorKind::TransformerConfig)
/// errors naming the parameter.
#[derive(Clone, Copy, Debug)]
pub struct Params<'a> {
    tag: &'a str,
    fields: &'a DocObject,
}

impl<'a> Params<'a> {
    /// Wraps the configuration object of a transformer tagged `tag`.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` if `config` is not an object.
    pub fn new(tag: &'a str, config: &'a Document) -> Result<Self> {
        config
            .as_object()
            .map(|fields| Self { tag, fields })
            .ok_or_else(|| {
                Error::transformer_config(
                    tag,
                    "",
                    format!("configuration must be an object, found {}", config.type_name()),
                )
            })
    }

    /// The transformer type tag.
    #[must_use]
    pub const fn tag(&self) -> &'a str {
        self.tag
    }

    /// A raw parameter value; `None` when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Document> {
        self.fields.get(name)
    }

    fn error(&self, name: &str, message: impl Into<String>) -> Error {
        Error::transformer_config(self.tag, name, message)
    }

    /// A string parameter that must be present. The empty string is accepted.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` if absent or not a string.
    pub fn required_str(&self, name: &str) -> Result<&'a str> {
        self.optional_str(name)?
            .ok_or_else(|| self.error(name, "not defined"))
    }

    /// A string parameter that may be absent.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` if present but not a string.
    pub fn optional_str(&self, name: &str) -> Result<Option<&'a str>> {
        match self.get(name) {
            None => Ok(None),
            Some(Document::String(s)) => Ok(Some(&**s)),
            Some(other) => Err(self.error(
                name,
                format!("must be a string, found {}", other.type_name()),
            )),
        }
    }

    /// An integer parameter that must be present.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` if absent or not an integer.
    pub fn required_int(&self, name: &str) -> Result<i64> {
        self.optional_int(name)?
            .ok_or_else(|| self.error(name, "not defined"))
    }

    /// An integer parameter that may be absent.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` if present but not an integer.
    pub fn optional_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| {
                self.error(
                    name,
                    format!("must be an integer, found {}", value.type_name()),
                )
            }),
        }
    }

    /// A non-negative integer parameter that may be absent.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` if present but not a non-negative integer.
    pub fn optional_index(&self, name: &str) -> Result<Option<usize>> {
        match self.optional_int(name)? {
            None => Ok(None),
            Some(n) => usize::try_from(n)
                .map(Some)
                .map_err(|_| self.error(name, format!("must not be negative, found {n}"))),
        }
    }
}

// =============================================================================
// Built-in transformers
// =============================================================================

/// Replaces every occurrence of `find` with `replace_with`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceAll {
    find: String,
    replace_with: String,
}

impl ReplaceAll {
    /// Type tag.
    pub const TAG: &'static str = "ReplaceAll";

    /// Builds from `find` and `replaceWith`.
    ///
    /// # Errors
    ///
    /// `find` and `replaceWith` must both be present strings. Either may be
    /// empty.
    pub fn from_params(params: &Params<'_>) -> Result<Self> {
        let (find, replace_with) = find_and_replace(params)?;
        Ok(Self { find, replace_with })
    }
}

impl Transformer for ReplaceAll {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        Some(input.replace(&self.find, &self.replace_with))
    }
}

/// Replaces the first occurrence of `find` with `replace_with`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceFirst {
    find: String,
    replace_with: String,
}

impl ReplaceFirst {
    /// Type tag.
    pub const TAG: &'static str = "ReplaceFirst";

    /// Builds from `find` and `replaceWith`.
    ///
    /// # Errors
    ///
    /// Same rules as [`ReplaceAll::from_params`].
    pub fn from_params(params: &Params<'_>) -> Result<Self> {
        let (find, replace_with) = find_and_replace(params)?;
        Ok(Self { find, replace_with })
    }
}

impl Transformer for ReplaceFirst {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        Some(input.replacen(&self.find, &self.replace_with, 1))
    }
}

fn find_and_replace(params: &Params<'_>) -> Result<(String, String)> {
    let find = params.required_str("find")?;
    let replace_with = params.required_str("replaceWith")?;
    Ok((find.to_string(), replace_with.to_string()))
}

/// Lowercases the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowerCase;

impl LowerCase {
    /// Type tag.
    pub const TAG: &'static str = "LowerCase";
}

impl Transformer for LowerCase {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        Some(input.to_lowercase())
    }
}

/// Uppercases the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpperCase;

impl UpperCase {
    /// Type tag.
    pub const TAG: &'static str = "UpperCase";
}

impl Transformer for UpperCase {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        Some(input.to_uppercase())
    }
}

/// Takes up to `max_length` characters starting at character `start`.
///
/// Not applicable when `start` lies past the end of the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Substring {
    start: usize,
    max_length: Option<usize>,
}

impl Substring {
    /// Type tag.
    pub const TAG: &'static str = "Substring";

    /// Builds from `start` (required) and `maxLength` (optional).
    ///
    /// # Errors
    ///
    /// Both must be non-negative integers.
    pub fn from_params(params: &Params<'_>) -> Result<Self> {
        let start = params
            .optional_index("start")?
            .ok_or_else(|| Error::transformer_config(params.tag(), "start", "not defined"))?;
        let max_length = params.optional_index("maxLength")?;
        Ok(Self { start, max_length })
    }
}

impl Transformer for Substring {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        if self.start > input.chars().count() {
            return None;
        }
        let rest = input.chars().skip(self.start);
        Some(match self.max_length {
            Some(max) => rest.take(max).collect(),
            None => rest.collect(),
        })
    }
}

/// Splits on `delimiter` and keeps one piece.
///
/// `get` indexes from zero; `-1` selects the last piece. Not applicable when
/// the index is out of range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitAndGet {
    delimiter: String,
    get: i64,
}

impl SplitAndGet {
    /// Type tag.
    pub const TAG: &'static str = "SplitAndGet";

    /// Builds from `delimiter` and `get`.
    ///
    /// # Errors
    ///
    /// `delimiter` must be a non-empty string and `get` an integer of at least
    /// `-1`.
    pub fn from_params(params: &Params<'_>) -> Result<Self> {
        let delimiter = params.required_str("delimiter")?;
        if delimiter.is_empty() {
            return Err(Error::transformer_config(
                params.tag(),
                "delimiter",
                "must not be empty",
            ));
        }
        let get = params.required_int("get")?;
        if get < -1 {
            return Err(Error::transformer_config(
                params.tag(),
                "get",
                format!("must be -1 or a non-negative index, found {get}"),
            ));
        }
        Ok(Self {
            delimiter: delimiter.to_string(),
            get,
        })
    }
}

impl Transformer for SplitAndGet {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        let delimiter = self.delimiter.as_str();
        let piece = if self.get == -1 {
            input.rsplit(delimiter).next()
        } else {
            usize::try_from(self.get)
                .ok()
                .and_then(|n| input.split(delimiter).nth(n))
        };
        piece.map(str::to_string)
    }
}

/// Passes numeric text through unchanged.
///
/// Numeric means an optional leading `-`, at least one digit, and at most one
/// decimal point with digits on both sides. Not applicable otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsNumber;

impl IsNumber {
    /// Type tag.
    pub const TAG: &'static str = "IsNumber";

    fn is_numeric(text: &str) -> bool {
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (unsigned, None),
        };
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        digits(whole) && fraction.is_none_or(digits)
    }
}

impl Transformer for IsNumber {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn transform(&self, input: &str) -> Option<String> {
        Self::is_numeric(input).then(|| input.to_string())
    }
}
