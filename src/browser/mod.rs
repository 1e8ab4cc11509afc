//! Debt clock extraction through a headless browser.
//!
//! The dashboard fills its numbers in client-side, so plain HTTP is not enough.
//! `DebtClock::fetch` drives one browser session through
//! `Launching → PageLoaded → FieldsExtracting → Closed`; `Closed` is reached on
//! every path once the launch has succeeded.

pub mod chromium;

use crate::config::BrowserConfig;
use crate::models::{BrowserField, BrowserFieldResult, FailureKind};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// Interval between element lookups while a field waits for its element.
const FIELD_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("failed to install request filter: {0}")]
    Interception(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("element lookup failed: {0}")]
    Element(String),
    #[error("failed to close browser: {0}")]
    Close(String),
}

/// Resource types kept out of the page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedResource {
    Image,
    Font,
    Media,
}

pub const BLOCKED_RESOURCES: &[BlockedResource] =
    &[BlockedResource::Image, BlockedResource::Font, BlockedResource::Media];

// ── Backend traits ────────────────────────────────────────────────────────────

/// A browser engine able to open one isolated page.
#[async_trait]
pub trait BrowserBackend: Send + Sync {
    /// Start the engine and open a page in a fresh context using `user_agent`.
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserPage>, BrowserError>;
}

/// A single page inside a launched browser. Owns the browser process.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Abort requests of the given kinds, let everything else through.
    async fn block_resources(&mut self, kinds: &[BlockedResource]) -> Result<(), BrowserError>;
    /// Navigate and return once the DOM content has loaded.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;
    /// Inner text of the element with `element_id`, `None` while it is absent.
    async fn element_text(&self, element_id: &str) -> Result<Option<String>, BrowserError>;
    /// Shut the page and its browser down.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Launching,
    PageLoaded,
    FieldsExtracting,
    Closed,
}

pub struct DebtClock {
    url: String,
    user_agent: String,
    navigation_timeout: Duration,
    settle: Duration,
    fields: Vec<BrowserField>,
}

impl DebtClock {
    pub fn new(config: &BrowserConfig, user_agent: &str, fields: Vec<BrowserField>) -> Self {
        Self {
            url: config.dashboard_url.clone(),
            user_agent: user_agent.to_string(),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            settle: Duration::from_millis(config.settle_ms),
            fields,
        }
    }

    /// Read every field, one result per field in field order.
    ///
    /// Only a launch failure is returned as an error; navigation and field
    /// failures come back as sentinel results.
    pub async fn fetch(
        &self,
        backend: &dyn BrowserBackend,
    ) -> Result<Vec<BrowserFieldResult>, BrowserError> {
        trace_state(SessionState::Launching);
        let mut page = backend.launch(&self.user_agent).await?;

        let results = self.run(page.as_mut()).await;

        if let Err(e) = page.close().await {
            warn!("{}", e);
        }
        trace_state(SessionState::Closed);

        Ok(results)
    }

    async fn run(&self, page: &mut dyn BrowserPage) -> Vec<BrowserFieldResult> {
        if let Err(e) = page.block_resources(BLOCKED_RESOURCES).await {
            warn!("{}; loading page unfiltered", e);
        }

        let loaded = match timeout(self.navigation_timeout, page.navigate(&self.url)).await {
            Ok(r) => r,
            Err(_) => Err(BrowserError::Navigation(format!(
                "timed out after {:?}",
                self.navigation_timeout
            ))),
        };
        if let Err(e) = loaded {
            error!("Error fetching Debt Clock: {}", e);
            return self.all_sentinel(FailureKind::BrowserNavigationFailure(e.to_string()));
        }
        trace_state(SessionState::PageLoaded);

        // Values are rendered by script after DOMContentLoaded.
        sleep(self.settle).await;

        trace_state(SessionState::FieldsExtracting);
        let mut results = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            results.push(read_field(&*page, field).await);
        }

        info!(
            "Debt clock: {}/{} fields read",
            results.iter().filter(|r| r.failure.is_none()).count(),
            results.len()
        );
        results
    }

    fn all_sentinel(&self, kind: FailureKind) -> Vec<BrowserFieldResult> {
        self.fields
            .iter()
            .map(|f| BrowserFieldResult::sentinel(f.clone(), kind.clone()))
            .collect()
    }
}

/// Wait for the field's element and read it, bounded by the field's own timeout.
async fn read_field(page: &dyn BrowserPage, field: &BrowserField) -> BrowserFieldResult {
    let wait_for_text = async {
        loop {
            if let Some(text) = page.element_text(&field.element_id).await? {
                return Ok::<String, BrowserError>(text.trim().to_string());
            }
            sleep(FIELD_POLL_INTERVAL).await;
        }
    };

    match timeout(Duration::from_millis(field.timeout_ms), wait_for_text).await {
        Ok(Ok(text)) => BrowserFieldResult::read(field.clone(), text),
        Ok(Err(e)) => {
            warn!("{} (#{}): {}", field.label, field.element_id, e);
            BrowserFieldResult::sentinel(field.clone(), FailureKind::BrowserFieldError(e.to_string()))
        }
        Err(_) => {
            warn!("{} (#{}): not found within {}ms", field.label, field.element_id, field.timeout_ms);
            BrowserFieldResult::sentinel(field.clone(), FailureKind::BrowserFieldTimeout)
        }
    }
}

fn trace_state(state: SessionState) {
    debug!("debt clock session: {:?}", state);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
