pub mod http_client;
pub mod selectors;

use crate::config::ScraperConfig;
use crate::models::{ExtractionResult, FailureKind, FetchTarget};
use anyhow::Result;
use reqwest::StatusCode;
use tracing::{debug, warn};

use self::selectors::{SelectorMatch, SelectorStrategy, first_match};

// ── Static extractor ──────────────────────────────────────────────────────────

/// Single-attempt page fetch followed by ordered selector fallback.
///
/// `extract` never returns an error: every failure is folded into the
/// `ExtractionResult` so a batch of extractions always completes.
pub struct StaticExtractor {
    client: reqwest::Client,
    strategies: Vec<SelectorStrategy>,
}

impl StaticExtractor {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            client: http_client::build_client(config)?,
            strategies: SelectorStrategy::compile_all(&config.selectors)?,
        })
    }

    pub async fn extract(&self, target: &FetchTarget) -> ExtractionResult {
        match self.fetch_value(target).await {
            Ok(value) => {
                debug!("{}: {}", target.display_name, value);
                ExtractionResult::found(target.clone(), value)
            }
            Err(kind) => {
                warn!("Failed to fetch {} [{}]: {}", target.display_name, target.category, kind);
                ExtractionResult::failed(target.clone(), kind)
            }
        }
    }

    async fn fetch_value(&self, target: &FetchTarget) -> Result<String, FailureKind> {
        debug!("GET {}", target.url);

        let resp = self
            .client
            .get(&target.url)
            .send()
            .await
            .map_err(|e| FailureKind::NetworkError(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FailureKind::HttpStatus(status.as_u16()));
        }

        let body = resp.text().await.map_err(|e| {
            if e.is_decode() {
                FailureKind::ParseError(e.to_string())
            } else {
                FailureKind::NetworkError(e.to_string())
            }
        })?;

        match first_match(&body, &self.strategies) {
            SelectorMatch::Hit { rule, text } if !text.is_empty() => {
                debug!("{}: matched by {}", target.display_name, rule);
                Ok(text)
            }
            SelectorMatch::Hit { rule, .. } => {
                debug!("{}: {} matched an empty element", target.display_name, rule);
                Err(FailureKind::SelectorMiss)
            }
            SelectorMatch::Miss => Err(FailureKind::SelectorMiss),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn target(server: &MockServer, slug: &str) -> FetchTarget {
        FetchTarget::new("Spagna", &format!("{}/rates-bonds/{}", server.uri(), slug))
    }

    fn extractor() -> StaticExtractor {
        StaticExtractor::new(&ScraperConfig::default()).unwrap()
    }

    async fn serve(server: &MockServer, slug: &str, resp: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/rates-bonds/{}", slug)))
            .respond_with(resp)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_primary_selector_value() {
        let server = MockServer::start().await;
        let body = r#"<html><body><div data-test="instrument-price-last">3.45</div></body></html>"#;
        serve(&server, "spain-10-year-bond-yield", ResponseTemplate::new(200).set_body_string(body)).await;

        let t = target(&server, "spain-10-year-bond-yield");
        let result = extractor().extract(&t).await;

        assert_eq!(result.value(), Some("3.45"));
        assert_eq!(result.target.display_name, "Spain 10 Year");
    }

    #[tokio::test]
    async fn test_fallback_selector_value() {
        let server = MockServer::start().await;
        let body = r#"<html><body><span id="last_last">2.10</span></body></html>"#;
        serve(&server, "spain-10-year-bond-yield", ResponseTemplate::new(200).set_body_string(body)).await;

        let result = extractor().extract(&target(&server, "spain-10-year-bond-yield")).await;
        assert_eq!(result.value(), Some("2.10"));
    }

    #[tokio::test]
    async fn test_selector_miss() {
        let server = MockServer::start().await;
        serve(
            &server,
            "spain-10-year-bond-yield",
            ResponseTemplate::new(200).set_body_string("<html><body><p>Access denied</p></body></html>"),
        )
        .await;

        let result = extractor().extract(&target(&server, "spain-10-year-bond-yield")).await;
        assert_eq!(result.failure(), Some(&FailureKind::SelectorMiss));
    }

    #[tokio::test]
    async fn test_empty_match_is_a_miss() {
        let server = MockServer::start().await;
        let body = r#"<div data-test="instrument-price-last"></div><span id="last_last">2.10</span>"#;
        serve(&server, "spain-10-year-bond-yield", ResponseTemplate::new(200).set_body_string(body)).await;

        let result = extractor().extract(&target(&server, "spain-10-year-bond-yield")).await;
        assert_eq!(result.failure(), Some(&FailureKind::SelectorMiss));
    }

    #[tokio::test]
    async fn test_non_200_is_http_status() {
        let server = MockServer::start().await;
        serve(&server, "spain-10-year-bond-yield", ResponseTemplate::new(403)).await;

        let result = extractor().extract(&target(&server, "spain-10-year-bond-yield")).await;
        assert_eq!(result.failure(), Some(&FailureKind::HttpStatus(403)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Reserve a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let t = FetchTarget::new(
            "Spagna",
            &format!("http://127.0.0.1:{}/rates-bonds/spain-10-year-bond-yield", port),
        );

        let result = extractor().extract(&t).await;
        assert!(matches!(result.failure(), Some(FailureKind::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_parse_error() {
        let server = MockServer::start().await;
        serve(
            &server,
            "spain-10-year-bond-yield",
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(b"this is not gzip at all".to_vec()),
        )
        .await;

        let result = extractor().extract(&target(&server, "spain-10-year-bond-yield")).await;
        assert!(matches!(result.failure(), Some(FailureKind::ParseError(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start().await;
        serve(
            &server,
            "spain-10-year-bond-yield",
            ResponseTemplate::new(200)
                .set_body_string(r#"<span id="last_last">2.10</span>"#)
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .await;

        let config = ScraperConfig {
            timeout_secs: 1,
            ..ScraperConfig::default()
        };
        let result = StaticExtractor::new(&config)
            .unwrap()
            .extract(&target(&server, "spain-10-year-bond-yield"))
            .await;
        assert!(matches!(result.failure(), Some(FailureKind::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_sends_browser_like_headers() {
        let server = MockServer::start().await;
        let cfg = ScraperConfig::default();
        let sent_as_browser = move |req: &Request| {
            let h = |name: &str| req.headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
            h("user-agent") == Some(cfg.user_agent.clone())
                && h("accept-language") == Some(cfg.accept_language.clone())
                && h("referer") == Some(cfg.referer.clone())
        };
        Mock::given(method("GET"))
            .and(sent_as_browser)
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<span id="last_last">1.00</span>"#))
            .expect(1)
            .mount(&server)
            .await;

        let result = extractor().extract(&target(&server, "spain-1-year-bond-yield")).await;
        assert_eq!(result.value(), Some("1.00"));
    }
}
