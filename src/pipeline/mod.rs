//! Run orchestrator: catalog → static extraction → browser pass → report.
//!
//! ## Run order
//!
//! 1. For each catalog category, in order: build one HTTP client, fetch every
//!    target of the category concurrently, wait for all of them, print.
//!    Categories never overlap, so open connections stay bounded by the
//!    largest category.
//! 2. Read the debt clock fields through a headless browser (unless disabled).
//! 3. Print total elapsed time.
//!
//! Individual target or field failures are printed, never returned; only a
//! startup problem (bad selector, client build, browser launch) ends the run
//! with an error.

use crate::browser::{BrowserBackend, DebtClock, chromium::ChromiumBackend};
use crate::catalog;
use crate::config::AppConfig;
use crate::models::{ExtractionResult, FetchTarget};
use crate::report;
use crate::scraper::StaticExtractor;
use crate::utils::Timer;
use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::info;

/// Fetch every target of one category concurrently.
///
/// All extractions are started before any is awaited; the returned list has
/// one entry per target, in input order, whatever the completion order.
pub async fn fetch_category(
    extractor: &StaticExtractor,
    category: &str,
    targets: &[FetchTarget],
) -> Vec<ExtractionResult> {
    if targets.is_empty() {
        return Vec::new();
    }

    info!("{}: fetching {} targets", category, targets.len());
    let results = join_all(targets.iter().map(|t| extractor.extract(t))).await;

    let found = results.iter().filter(|r| r.value().is_some()).count();
    info!("{}: {}/{} values found", category, found, results.len());
    results
}

pub struct Pipeline {
    config: AppConfig,
    with_browser: bool,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            with_browser: true,
        }
    }

    pub fn without_browser(mut self) -> Self {
        self.with_browser = false;
        self
    }

    pub async fn run(&self) -> Result<RunStats> {
        let timer = Timer::start("Snapshot run");
        let mut stats = RunStats::default();

        // ── 1. Static pages, one category at a time ──────────────────────────
        for (category, urls) in catalog::CATEGORIES {
            let targets = catalog::targets(category, urls);
            let phase = Timer::start(format!("Category {}", category));

            // A fresh client per category: its connection pool lives only as
            // long as the category's fan-out.
            let extractor = StaticExtractor::new(&self.config.scraper)
                .with_context(|| format!("Failed to build extractor for {}", category))?;

            let results = fetch_category(&extractor, category, &targets).await;
            stats.record(&results);
            phase.finish();
            report::print_category(category, &results);
        }

        // ── 2. Browser-rendered debt clock ───────────────────────────────────
        if self.with_browser {
            let backend = ChromiumBackend::new(&self.config.browser);
            let fields = self.debt_clock(&backend).await?;
            report::print_debt_clock(&fields);
        }

        // ── 3. Elapsed ───────────────────────────────────────────────────────
        report::print_elapsed(timer.finish());

        info!(
            "=== Done: {} targets | {} values | {} failures ===",
            stats.targets, stats.found, stats.failed
        );
        Ok(stats)
    }

    async fn debt_clock(
        &self,
        backend: &dyn BrowserBackend,
    ) -> Result<Vec<crate::models::BrowserFieldResult>> {
        let fields = catalog::debt_fields(self.config.browser.field_timeout_ms);
        let clock = DebtClock::new(&self.config.browser, &self.config.scraper.user_agent, fields);
        clock.fetch(backend).await.context("Debt clock browser launch failed")
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub targets: usize,
    pub found: usize,
    pub failed: usize,
}

impl RunStats {
    fn record(&mut self, results: &[ExtractionResult]) {
        self.targets += results.len();
        for r in results {
            match r.failure() {
                None => self.found += 1,
                Some(_) => self.failed += 1,
            }
        }
    }
}
