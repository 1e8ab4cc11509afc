use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Static page extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_referer")]
    pub referer: String,

    /// Ordered selector strategies; the first rule that matches an element wins.
    #[serde(default = "default_selectors")]
    pub selectors: Vec<SelectorRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectorRule {
    pub name: String,
    pub css: String,
}

/// Debt clock (browser-rendered dashboard) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,

    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_field_timeout_ms")]
    pub field_timeout_ms: u64,

    /// Falls back to chromiumoxide's own executable detection when unset.
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub headless: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    15
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}
fn default_accept_language() -> String {
    "en-US,en;q=0.9,es;q=0.8".to_string()
}
fn default_referer() -> String {
    "https://es.investing.com/".to_string()
}
fn default_selectors() -> Vec<SelectorRule> {
    vec![
        SelectorRule {
            name: "instrument-price-last".to_string(),
            css: "div[data-test='instrument-price-last']".to_string(),
        },
        SelectorRule {
            name: "legacy-last-last".to_string(),
            css: "span#last_last".to_string(),
        },
    ]
}
fn default_dashboard_url() -> String {
    crate::catalog::DEBT_CLOCK_URL.to_string()
}
fn default_navigation_timeout_ms() -> u64 {
    30_000
}
fn default_settle_ms() -> u64 {
    2_000
}
fn default_field_timeout_ms() -> u64 {
    5_000
}
fn default_true() -> bool {
    true
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("YW").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Ignoring unreadable configuration ({}), using defaults", e);
            AppConfig::default()
        });
        Ok(app_cfg)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            referer: default_referer(),
            selectors: default_selectors(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            dashboard_url: default_dashboard_url(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_ms: default_settle_ms(),
            field_timeout_ms: default_field_timeout_ms(),
            chrome_executable: None,
            headless: true,
        }
    }
}
