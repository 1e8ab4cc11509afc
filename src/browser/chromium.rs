//! Chromium backend driven over CDP with chromiumoxide.

use super::{BlockedResource, BrowserBackend, BrowserError, BrowserPage};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub struct ChromiumBackend {
    config: BrowserConfig,
}

impl ChromiumBackend {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn launch_config(&self) -> Result<LaunchConfig, BrowserError> {
        let mut builder = LaunchConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| BrowserError::Launch(format!("browser config: {e}")))
    }
}

#[async_trait]
impl BrowserBackend for ChromiumBackend {
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserPage>, BrowserError> {
        info!("Launching headless Chromium");
        let (browser, mut handler) = Browser::launch(self.launch_config()?)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error (ignoring): {}", e);
                }
            }
        });

        // From here on the browser process exists; dropping `browser` on an
        // early return kills it.
        let context = browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
            .map_err(|e| BrowserError::Launch(format!("browser context: {e}")))?;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context)
            .build()
            .map_err(|e| BrowserError::Launch(format!("target params: {e}")))?;

        let page = browser
            .new_page(target)
            .await
            .map_err(|e| BrowserError::Launch(format!("new page: {e}")))?;

        page.execute(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(|e| BrowserError::Launch(format!("user agent: {e}")))?;

        Ok(Box::new(ChromiumPage {
            browser,
            handler_task,
            page,
            interceptor: None,
        }))
    }
}

pub struct ChromiumPage {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    interceptor: Option<JoinHandle<()>>,
}

fn resource_type(kind: BlockedResource) -> ResourceType {
    match kind {
        BlockedResource::Image => ResourceType::Image,
        BlockedResource::Font => ResourceType::Font,
        BlockedResource::Media => ResourceType::Media,
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn block_resources(&mut self, kinds: &[BlockedResource]) -> Result<(), BrowserError> {
        let blocked: Vec<ResourceType> = kinds.iter().copied().map(resource_type).collect();

        let mut paused = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| BrowserError::Interception(e.to_string()))?;

        self.page
            .execute(
                EnableParams::builder()
                    .pattern(RequestPattern::builder().url_pattern("*").build())
                    .build(),
            )
            .await
            .map_err(|e| BrowserError::Interception(e.to_string()))?;

        let page = self.page.clone();
        self.interceptor = Some(tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let request_id = event.request_id.clone();
                let outcome = if blocked.contains(&event.resource_type) {
                    page.execute(FailRequestParams::new(request_id, ErrorReason::BlockedByClient))
                        .await
                        .map(|_| ())
                } else {
                    page.execute(ContinueRequestParams::new(request_id)).await.map(|_| ())
                };
                if let Err(e) = outcome {
                    debug!("Paused request {}: {}", event.request.url, e);
                }
            }
        }));

        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let mut dom_ready = self
            .page
            .event_listener::<EventDomContentEventFired>()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        let nav = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        if let Some(reason) = nav.result.error_text.clone() {
            return Err(BrowserError::Navigation(reason));
        }

        dom_ready
            .next()
            .await
            .map(|_| ())
            .ok_or_else(|| BrowserError::Navigation("page closed before DOMContentLoaded".into()))
    }

    async fn element_text(&self, element_id: &str) -> Result<Option<String>, BrowserError> {
        let script = format!(
            "(() => {{ const el = document.getElementById({:?}); \
             return [el !== null, el ? el.innerText : \"\"]; }})()",
            element_id
        );

        let (found, text): (bool, String) = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Element(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::Element(format!("{e:?}")))?;

        Ok(found.then_some(text))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        let mut this = *self;
        if let Some(interceptor) = this.interceptor.take() {
            interceptor.abort();
        }

        let closed = this.browser.close().await.map(|_| ());
        if let Err(e) = this.browser.wait().await {
            error!("Browser process did not exit cleanly: {}", e);
        }
        let _ = this.handler_task.await;

        closed.map_err(|e| BrowserError::Close(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::DebtClock;
    use crate::models::FIELD_SENTINEL;

    #[test]
    fn test_blocked_kinds_map_to_cdp_types() {
        let mapped: Vec<ResourceType> = crate::browser::BLOCKED_RESOURCES
            .iter()
            .copied()
            .map(resource_type)
            .collect();
        assert_eq!(mapped, vec![ResourceType::Image, ResourceType::Font, ResourceType::Media]);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_reads_inline_page() {
        let config = BrowserConfig {
            dashboard_url: "data:text/html,<span id='X2a5BWRG'>$1,000</span>".to_string(),
            settle_ms: 0,
            ..BrowserConfig::default()
        };
        let fields = crate::catalog::debt_fields(2_000);
        let clock = DebtClock::new(&config, "test-agent/1.0", fields);

        let results = clock
            .fetch(&ChromiumBackend::new(&config))
            .await
            .expect("failed to launch Chromium");

        assert_eq!(results[0].text, "$1,000");
        assert_eq!(results[1].text, FIELD_SENTINEL);
    }
}
