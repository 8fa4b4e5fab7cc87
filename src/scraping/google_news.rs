// Renderer for news.google.com search results
//
// Results are rendered client-side and lazy-load on scroll, so a plain HTTP
// fetch returns an empty shell. Headless Chrome loads the page, the consent
// wall is dismissed when present, and the page is scrolled a fixed number of
// times before the markup is captured.

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{DocumentSource, RenderedDocument};
use crate::error::NewsError;

/// Button texts of the consent wall's "reject" action
const CONSENT_PHRASES: &[&str] = &["Reject all", "Reject cookies", "I disagree"];

/// Element kinds the consent action may be rendered as
const CONSENT_ROLES: &[&str] = &["//button", "//*[@role='button']"];

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Slack added to the browser idle timeout on top of the planned waits
const IDLE_TIMEOUT_SLACK: Duration = Duration::from_secs(60);

/// Search endpoint and its fixed locale parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchEndpoint {
    pub url: String,
    pub hl: String,
    pub gl: String,
    pub ceid: String,
}

impl Default for SearchEndpoint {
    fn default() -> Self {
        Self {
            url: "https://news.google.com/search".to_string(),
            hl: "en-US".to_string(),
            gl: "US".to_string(),
            ceid: "US:en".to_string(),
        }
    }
}

impl SearchEndpoint {
    /// Build the results URL for a query. The query is form-encoded
    /// (spaces become `+`); locale parameters are appended verbatim.
    pub fn search_url(&self, query: &str) -> Result<String> {
        url::Url::parse(&self.url).map_err(|e| NewsError::InvalidEndpoint {
            endpoint: self.url.clone(),
            reason: e.to_string(),
        })?;

        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        Ok(format!(
            "{}?q={}&hl={}&gl={}&ceid={}",
            self.url, encoded, self.hl, self.gl, self.ceid
        ))
    }
}

/// Timing and output knobs for one render
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub endpoint: SearchEndpoint,
    /// Fixed wait after navigation, consent dismissal and each scroll
    pub delay: Duration,
    /// Number of scroll-to-bottom passes
    pub scrolls: u32,
    /// Where the captured markup is saved for later replay
    pub snapshot_path: PathBuf,
}

/// Tab operations a render needs. Chrome tabs implement it; keeping the
/// session logic on this trait lets it run without a browser.
pub trait PageDriver {
    /// Load `url` and wait for the navigation to settle
    fn navigate(&self, url: &str) -> Result<()>;

    /// Click the first element matching `xpath`
    fn click_xpath(&self, xpath: &str) -> Result<()>;

    fn run_script(&self, script: &str) -> Result<()>;

    /// Current document markup
    fn content(&self) -> Result<String>;

    /// Close the page; called once on every exit path
    fn release(&self) -> Result<()>;

    fn wait(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl PageDriver for Tab {
    fn navigate(&self, url: &str) -> Result<()> {
        self.navigate_to(url).context("Failed to navigate to URL")?;
        self.wait_until_navigated()
            .context("Navigation to search page did not complete")?;
        Ok(())
    }

    fn click_xpath(&self, xpath: &str) -> Result<()> {
        self.find_element_by_xpath(xpath)?.click()?;
        Ok(())
    }

    fn run_script(&self, script: &str) -> Result<()> {
        self.evaluate(script, false)?;
        Ok(())
    }

    fn content(&self) -> Result<String> {
        self.get_content().context("Failed to get page content")
    }

    fn release(&self) -> Result<()> {
        Tab::close(self, true)?;
        Ok(())
    }
}

/// One headless Chrome session per fetch
pub struct RenderSession {
    settings: RenderSettings,
}

impl RenderSession {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    fn launch(&self) -> Result<Browser> {
        info!("Launching headless Chrome browser");

        let options = LaunchOptions {
            headless: true,
            sandbox: false,
            args: vec![
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-blink-features=AutomationControlled"),
                std::ffi::OsStr::new("--user-agent=Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
                std::ffi::OsStr::new("--window-size=1920,1080"),
            ],
            idle_browser_timeout: self.idle_timeout(),
            ..Default::default()
        };

        Browser::new(options).context("Failed to launch headless Chrome. Is Chrome/Chromium installed?")
    }

    /// Longest single quiet period is one delay, but keep the whole
    /// planned run inside the timeout so a long delay never drops the
    /// connection. Saturates instead of overflowing on huge delays.
    fn idle_timeout(&self) -> Duration {
        let waits = self.settings.scrolls.saturating_add(2);
        self.settings
            .delay
            .saturating_mul(waits)
            .saturating_add(IDLE_TIMEOUT_SLACK)
    }

    /// Render `url` on `page`, then release the page whether or not the
    /// render succeeded.
    fn drive(&self, page: &dyn PageDriver, url: &str) -> Result<RenderedDocument> {
        let result = self.render(page, url);
        if let Err(e) = page.release() {
            debug!("Failed to close tab cleanly: {}", e);
        }
        result
    }

    fn render(&self, page: &dyn PageDriver, url: &str) -> Result<RenderedDocument> {
        page.navigate(url)?;

        debug!("Waiting {:?} for first paint", self.settings.delay);
        page.wait(self.settings.delay);

        self.dismiss_consent(page);
        self.load_more(page);

        let document = RenderedDocument::new(page.content()?);

        let snapshot = &self.settings.snapshot_path;
        if let Err(e) = document.persist(snapshot) {
            warn!("Failed to save page HTML to {}: {}", snapshot.display(), e);
        } else {
            info!("Saved page HTML to {} for debugging", snapshot.display());
        }

        Ok(document)
    }

    /// Best effort: a missing or unclickable consent button is logged and
    /// the render carries on.
    fn dismiss_consent(&self, page: &dyn PageDriver) {
        match page.click_xpath(&consent_xpath()) {
            Ok(()) => {
                info!("Clicked 'Reject cookies' or similar button.");
                page.wait(self.settings.delay);
            }
            Err(e) => {
                info!("No cookie consent pop-up or reject button found/clicked: {}", e);
            }
        }
    }

    /// Scroll to the bottom `scrolls` times, waiting one delay after each.
    /// There is no check for whether new results appeared.
    fn load_more(&self, page: &dyn PageDriver) {
        for pass in 1..=self.settings.scrolls {
            debug!("Scroll {}/{}", pass, self.settings.scrolls);
            if let Err(e) = page.run_script(SCROLL_TO_BOTTOM) {
                warn!("Scroll {} failed: {}", pass, e);
            }
            page.wait(self.settings.delay);
        }
    }
}

impl DocumentSource for RenderSession {
    fn fetch(&self, query: &str) -> Result<RenderedDocument> {
        let url = self.settings.endpoint.search_url(query)?;
        info!("Searching Google News for: {}", query);
        debug!("Search URL: {}", url);

        let browser = self.launch()?;
        let result = browser
            .new_tab()
            .context("Failed to create new browser tab")
            .and_then(|tab| self.drive(&*tab, &url));
        // Dropping the browser terminates the Chrome process on every path
        drop(browser);
        result
    }
}

/// XPath union matching any consent role containing any reject phrase
pub fn consent_xpath() -> String {
    let condition = CONSENT_PHRASES
        .iter()
        .map(|phrase| format!("contains(., '{}')", phrase))
        .collect::<Vec<_>>()
        .join(" or ");

    CONSENT_ROLES
        .iter()
        .map(|role| format!("{}[{}]", role, condition))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[test]
    fn test_search_url_form_encodes_query() {
        let url = SearchEndpoint::default()
            .search_url(r#"NVDA OR "tech news" site:finance.yahoo.com"#)
            .unwrap();
        assert_eq!(
            url,
            "https://news.google.com/search?q=NVDA+OR+%22tech+news%22+site%3Afinance.yahoo.com&hl=en-US&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_search_url_rejects_bad_endpoint() {
        let endpoint = SearchEndpoint {
            url: "not a url".to_string(),
            ..SearchEndpoint::default()
        };
        let err = endpoint.search_url("q").unwrap_err();
        assert!(err.to_string().contains("invalid search endpoint"));
    }

    #[test]
    fn test_consent_xpath_covers_roles_and_phrases() {
        let xpath = consent_xpath();
        assert_eq!(
            xpath,
            "//button[contains(., 'Reject all') or contains(., 'Reject cookies') or contains(., 'I disagree')] | \
             //*[@role='button'][contains(., 'Reject all') or contains(., 'Reject cookies') or contains(., 'I disagree')]"
        );
    }

    #[test]
    fn test_idle_timeout_covers_planned_waits() {
        let session = RenderSession::new(RenderSettings {
            endpoint: SearchEndpoint::default(),
            delay: Duration::from_secs(3),
            scrolls: 5,
            snapshot_path: PathBuf::from("page.html"),
        });
        assert_eq!(session.idle_timeout(), Duration::from_secs(3 * 7 + 60));
    }

    #[test]
    fn test_idle_timeout_saturates_on_huge_delay() {
        let delay = crate::config::delay_from_secs(1e19).unwrap();
        let session = RenderSession::new(settings(delay, 5, PathBuf::from("page.html")));
        assert_eq!(session.idle_timeout(), Duration::MAX);
    }

    /// Scripted page that logs every call in order
    #[derive(Default)]
    struct FakePage {
        events: RefCell<Vec<String>>,
        fail_navigate: bool,
        consent_present: bool,
        fail_scripts: bool,
        snapshot: Option<PathBuf>,
    }

    impl FakePage {
        fn log(&self, event: impl Into<String>) {
            self.events.borrow_mut().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    impl PageDriver for FakePage {
        fn navigate(&self, url: &str) -> Result<()> {
            self.log(format!("navigate {}", url));
            if self.fail_navigate {
                anyhow::bail!("net::ERR_CONNECTION_REFUSED");
            }
            Ok(())
        }

        fn click_xpath(&self, _xpath: &str) -> Result<()> {
            self.log("click");
            if !self.consent_present {
                anyhow::bail!("No element found");
            }
            Ok(())
        }

        fn run_script(&self, script: &str) -> Result<()> {
            assert_eq!(script, SCROLL_TO_BOTTOM);
            self.log("scroll");
            if self.fail_scripts {
                anyhow::bail!("Runtime.evaluate failed");
            }
            Ok(())
        }

        fn content(&self) -> Result<String> {
            self.log("content");
            Ok("<html><body>results</body></html>".to_string())
        }

        fn release(&self) -> Result<()> {
            let saved = self.snapshot.as_ref().map(|p| p.exists()).unwrap_or(false);
            self.log(format!("release saved={}", saved));
            Ok(())
        }

        fn wait(&self, delay: Duration) {
            self.log(format!("wait {}ms", delay.as_millis()));
        }
    }

    fn settings(delay: Duration, scrolls: u32, snapshot_path: PathBuf) -> RenderSettings {
        RenderSettings {
            endpoint: SearchEndpoint::default(),
            delay,
            scrolls,
            snapshot_path,
        }
    }

    #[test]
    fn test_missing_consent_button_does_not_stop_render() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("page.html");
        let session = RenderSession::new(settings(Duration::from_millis(5), 2, snapshot.clone()));
        let page = FakePage {
            snapshot: Some(snapshot.clone()),
            ..FakePage::default()
        };

        let document = session.drive(&page, "https://news.google.com/search?q=x").unwrap();

        assert_eq!(document.as_str(), "<html><body>results</body></html>");
        assert_eq!(
            page.events(),
            vec![
                "navigate https://news.google.com/search?q=x",
                "wait 5ms",
                "click",
                "scroll",
                "wait 5ms",
                "scroll",
                "wait 5ms",
                "content",
                "release saved=true",
            ]
        );
        assert_eq!(std::fs::read_to_string(&snapshot).unwrap(), document.as_str());
    }

    #[test]
    fn test_consent_click_adds_one_wait() {
        let dir = TempDir::new().unwrap();
        let session = RenderSession::new(settings(
            Duration::from_millis(7),
            0,
            dir.path().join("page.html"),
        ));
        let page = FakePage {
            consent_present: true,
            ..FakePage::default()
        };

        session.drive(&page, "u").unwrap();

        assert_eq!(
            page.events(),
            vec!["navigate u", "wait 7ms", "click", "wait 7ms", "content", "release saved=false"]
        );
    }

    #[test]
    fn test_scroll_loop_runs_exactly_requested_passes() {
        let dir = TempDir::new().unwrap();
        for scrolls in [0u32, 1, 4] {
            let session = RenderSession::new(settings(
                Duration::ZERO,
                scrolls,
                dir.path().join("page.html"),
            ));
            let page = FakePage {
                fail_scripts: true,
                ..FakePage::default()
            };

            session.drive(&page, "u").unwrap();

            let events = page.events();
            let scroll_count = events.iter().filter(|e| e.as_str() == "scroll").count();
            assert_eq!(scroll_count, scrolls as usize);
            // first paint + one per scroll; no consent wait
            let wait_count = events.iter().filter(|e| e.starts_with("wait")).count();
            assert_eq!(wait_count, 1 + scrolls as usize);
        }
    }

    #[test]
    fn test_navigation_failure_still_releases_page() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("page.html");
        let session = RenderSession::new(settings(Duration::ZERO, 3, snapshot.clone()));
        let page = FakePage {
            fail_navigate: true,
            ..FakePage::default()
        };

        let err = session.drive(&page, "u").unwrap_err();

        assert!(err.to_string().contains("ERR_CONNECTION_REFUSED"));
        assert_eq!(page.events(), vec!["navigate u", "release saved=false"]);
        assert!(!snapshot.exists());
    }
}
