use thiserror::Error;

// ── Targets ───────────────────────────────────────────────────────────────────

/// One page to fetch, derived once from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub category: String,
    pub url: String,
    pub display_name: String,
}

impl FetchTarget {
    pub fn new(category: &str, url: &str) -> Self {
        Self {
            category: category.to_string(),
            url: url.to_string(),
            display_name: crate::catalog::display_name(url),
        }
    }
}

// ── Failures ──────────────────────────────────────────────────────────────────

/// Why a target or a browser field produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("unexpected status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("no selector strategy matched")]
    SelectorMiss,
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("navigation failed: {0}")]
    BrowserNavigationFailure(String),
    #[error("field timed out")]
    BrowserFieldTimeout,
    #[error("field read failed: {0}")]
    BrowserFieldError(String),
}

// ── Static extraction result ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub target: FetchTarget,
    pub outcome: Result<String, FailureKind>,
}

impl ExtractionResult {
    pub fn found(target: FetchTarget, value: String) -> Self {
        Self { target, outcome: Ok(value) }
    }

    pub fn failed(target: FetchTarget, kind: FailureKind) -> Self {
        Self { target, outcome: Err(kind) }
    }

    pub fn value(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn failure(&self) -> Option<&FailureKind> {
        self.outcome.as_ref().err()
    }
}

// ── Browser fields ────────────────────────────────────────────────────────────

/// Placeholder shown for a browser field that could not be read.
pub const FIELD_SENTINEL: &str = "ID Changed/Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserField {
    pub label: String,
    pub element_id: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserFieldResult {
    pub field: BrowserField,
    /// Inner text of the element, or `FIELD_SENTINEL`.
    pub text: String,
    pub failure: Option<FailureKind>,
}

impl BrowserFieldResult {
    pub fn read(field: BrowserField, text: String) -> Self {
        Self { field, text, failure: None }
    }

    pub fn sentinel(field: BrowserField, kind: FailureKind) -> Self {
        Self {
            field,
            text: FIELD_SENTINEL.to_string(),
            failure: Some(kind),
        }
    }
}
