//! Verifying an engine against a test fixture document.
//!
//! Each case names an input and the expected outcome. A missing
//! `resultPatternId` expects no match; `resultAttributes` are only compared
//! when the pattern matched.

use std::fmt;

use textglass_engine::{ClassificationEngine, ClassificationResult};
use textglass_foundation::{Document, DocumentHeader, DocumentKind, DomainId, Error, Result};
use tracing::{debug, info, warn};

const TESTS_FIELD: &str = "tests";
const INPUT_FIELD: &str = "input";
const RESULT_PATTERN_ID: &str = "resultPatternId";
const RESULT_ATTRIBUTES: &str = "resultAttributes";
const PATTERN_ID_KEY: &str = "patternId";

/// A case that did not produce the expected outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseFailure {
    /// Position of the case in the fixture.
    pub index: usize,
    /// The classified input.
    pub input: String,
    /// What went wrong.
    pub reason: FailureReason,
}

/// Why a case failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The winning pattern differed.
    PatternId {
        /// Expected pattern, `None` for no match.
        expected: Option<String>,
        /// Actual pattern.
        found: Option<String>,
    },
    /// One or more attributes differed.
    Attributes(Vec<AttributeMismatch>),
}

/// One attribute that differed from the expectation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMismatch {
    /// Attribute key.
    pub key: String,
    /// Expected value.
    pub expected: String,
    /// Actual value, `None` when missing.
    pub found: Option<String>,
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case {} ({:?}): ", self.index, self.input)?;
        match &self.reason {
            FailureReason::PatternId { expected, found } => write!(
                f,
                "expected pattern {}, found {}",
                expected.as_deref().unwrap_or("none"),
                found.as_deref().unwrap_or("none")
            ),
            FailureReason::Attributes(mismatches) => {
                for (i, m) in mismatches.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(
                        f,
                        "attribute '{}' expected {:?}, found {}",
                        m.key,
                        m.expected,
                        m.found
                            .as_deref()
                            .map_or_else(|| "nothing".to_string(), |v| format!("{v:?}"))
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of running a fixture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureReport {
    /// Domain the fixture was written for.
    pub domain: DomainId,
    /// Number of cases that passed.
    pub passed: usize,
    /// Cases that failed, in fixture order.
    pub failures: Vec<CaseFailure>,
}

impl FixtureReport {
    /// Total number of cases run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    /// Returns true if every case passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for FixtureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: passed {} of {} ({})",
            self.domain,
            self.passed,
            self.total(),
            if self.is_success() { "PASS" } else { "FAIL" }
        )
    }
}

/// Runs every case of `test_doc` against `engine`.
///
/// # Errors
///
/// Returns `InvalidDocument` if the document is not a test fixture or a case
/// has no string `input`, and `DomainMismatch` if the fixture targets another
/// domain or version.
pub fn run_fixture(engine: &ClassificationEngine, test_doc: &Document) -> Result<FixtureReport> {
    let header = DocumentHeader::read(test_doc, DocumentKind::Test)?;
    header.ensure_domain(engine.domain())?;
    info!(domain = %header.domain, "running fixture");

    let cases = match test_doc.get(TESTS_FIELD) {
        None | Some(Document::Null) => None,
        Some(Document::Array(cases)) => Some(cases),
        Some(other) => {
            return Err(Error::invalid_document(
                DocumentKind::Test.tag(),
                format!("'{TESTS_FIELD}' must be an array, found {}", other.type_name()),
            ));
        }
    };

    let mut report = FixtureReport {
        domain: header.domain,
        passed: 0,
        failures: Vec::new(),
    };

    for (index, case) in cases.into_iter().flatten().enumerate() {
        let input = case
            .get(INPUT_FIELD)
            .and_then(Document::as_str)
            .ok_or_else(|| {
                Error::invalid_document(DocumentKind::Test.tag(), "case has no string 'input'")
                    .in_frame(format!("case {index}"))
            })?;

        let result = engine.classify(input);
        match check_case(case, &result) {
            None => {
                debug!(index, input, pattern = ?result.pattern_id, "case passed");
                report.passed += 1;
            }
            Some(reason) => {
                let failure = CaseFailure {
                    index,
                    input: input.to_string(),
                    reason,
                };
                warn!("{failure}");
                report.failures.push(failure);
            }
        }
    }

    info!(
        passed = report.passed,
        total = report.total(),
        "fixture finished"
    );
    Ok(report)
}

fn check_case(case: &Document, result: &ClassificationResult) -> Option<FailureReason> {
    let expected = case.get(RESULT_PATTERN_ID).and_then(Document::scalar_text);
    if expected.as_deref() != result.pattern_id() {
        return Some(FailureReason::PatternId {
            expected,
            found: result.pattern_id.clone(),
        });
    }

    if !result.is_match() {
        return None;
    }

    let mismatches: Vec<_> = case
        .get(RESULT_ATTRIBUTES)
        .and_then(Document::as_object)
        .into_iter()
        .flat_map(|expected| expected.iter())
        .filter_map(|(key, value)| {
            let expected = value.scalar_text().unwrap_or_default();
            let found = result
                .attributes
                .get(key)
                .or_else(|| (&**key == PATTERN_ID_KEY).then(|| result.pattern_id()).flatten());
            (found != Some(expected.as_str())).then(|| AttributeMismatch {
                key: key.to_string(),
                expected,
                found: found.map(str::to_string),
            })
        })
        .collect();

    (!mismatches.is_empty()).then_some(FailureReason::Attributes(mismatches))
}
