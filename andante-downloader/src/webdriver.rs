//! Minimal blocking client for the W3C WebDriver protocol.
//!
//! Only the handful of commands the download flow needs: session
//! creation with auto-download preferences, navigation, CSS lookup with a
//! bounded wait, clicks (with programmatic fallback), attribute reads and
//! script execution. Talks to a local driver such as geckodriver.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde_json::{Value, json};

/// W3C element identifier key in JSON payloads.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How often element waits re-poll the page.
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors surfaced by the WebDriver protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum WebDriverError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Element click intercepted: {0}")]
    ClickIntercepted(String),

    #[error("Timed out waiting for element: {0}")]
    ElementWait(String),

    #[error("WebDriver session is gone")]
    SessionGone,

    #[error("WebDriver protocol error: {0}")]
    Protocol(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

fn map_protocol_error(error: &str, message: &str) -> WebDriverError {
    match error {
        "no such element" => WebDriverError::NoSuchElement(message.to_string()),
        "element click intercepted" => WebDriverError::ClickIntercepted(message.to_string()),
        "invalid session id" | "no such window" => WebDriverError::SessionGone,
        _ => WebDriverError::Protocol(format!("{error}: {message}")),
    }
}

/// Handle to an element on the current page.
#[derive(Debug, Clone)]
pub struct Element {
    id: String,
}

impl Element {
    /// JSON reference form, for passing as a script argument.
    fn to_arg(&self) -> Value {
        json!({ ELEMENT_KEY: self.id })
    }
}

/// How a click request was ultimately delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The native click landed.
    Clicked,
    /// The native click was intercepted by an overlay and was re-issued
    /// as a programmatic `element.click()` dispatch.
    InterceptedRetriedViaScript,
}

/// One remote-controlled browser session.
pub struct Browser {
    http: reqwest::blocking::Client,
    endpoint: String,
    session_id: String,
}

impl Browser {
    /// Start a browser session configured to drop downloads into
    /// `download_dir` without prompting, with native driver logging off.
    pub fn launch(endpoint: &str, download_dir: &Path) -> Result<Self, WebDriverError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "firefox",
                    "moz:firefoxOptions": {
                        "prefs": {
                            "browser.download.folderList": 2,
                            "browser.download.dir": download_dir.to_string_lossy(),
                            "browser.download.useDownloadDir": true,
                            "browser.helperApps.neverAsk.saveToDisk":
                                "audio/mpeg,audio/mp3,audio/flac,audio/x-flac,application/octet-stream",
                            "pdfjs.disabled": true
                        },
                        "log": { "level": "fatal" }
                    }
                }
            }
        });

        debug!("Starting WebDriver session at {endpoint}");
        let resp: Value = http
            .post(format!("{}/session", endpoint.trim_end_matches('/')))
            .json(&capabilities)
            .send()?
            .json()?;

        let value = Self::unwrap_value(resp)?;
        let session_id = value
            .get("sessionId")
            .and_then(|s| s.as_str())
            .ok_or_else(|| WebDriverError::Protocol("missing sessionId".to_string()))?
            .to_string();

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            session_id,
        })
    }

    /// Check a response envelope for a protocol error and return its value.
    fn unwrap_value(resp: Value) -> Result<Value, WebDriverError> {
        let value = resp
            .get("value")
            .cloned()
            .ok_or_else(|| WebDriverError::Protocol("response without value".to_string()))?;
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            let message = value.get("message").and_then(|m| m.as_str()).unwrap_or("");
            return Err(map_protocol_error(error, message));
        }
        Ok(value)
    }

    fn command(&self, path: &str, body: Option<Value>) -> Result<Value, WebDriverError> {
        let url = format!("{}/session/{}{}", self.endpoint, self.session_id, path);
        let request = match body {
            // Command endpoints are POST; a POST with no payload still
            // needs an empty JSON object body.
            Some(body) => self.http.post(&url).json(&body),
            None => self.http.post(&url).json(&json!({})),
        };
        Self::unwrap_value(request.send()?.json()?)
    }

    fn query(&self, path: &str) -> Result<Value, WebDriverError> {
        let url = format!("{}/session/{}{}", self.endpoint, self.session_id, path);
        Self::unwrap_value(self.http.get(&url).send()?.json()?)
    }

    pub fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        debug!("Navigating to {url}");
        self.command("/url", Some(json!({ "url": url })))?;
        Ok(())
    }

    /// Find an element by CSS selector, without waiting.
    pub fn find(&self, selector: &str) -> Result<Element, WebDriverError> {
        let value = self.command(
            "/element",
            Some(json!({ "using": "css selector", "value": selector })),
        )?;
        let id = value
            .get(ELEMENT_KEY)
            .and_then(|v| v.as_str())
            .ok_or_else(|| WebDriverError::Protocol("missing element reference".to_string()))?
            .to_string();
        Ok(Element { id })
    }

    /// Find an element, re-polling until it appears or `timeout` elapses.
    pub fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element, WebDriverError> {
        let start = Instant::now();
        loop {
            match self.find(selector) {
                Ok(element) => return Ok(element),
                Err(WebDriverError::NoSuchElement(_)) => {}
                Err(e) => return Err(e),
            }
            if start.elapsed() >= timeout {
                return Err(WebDriverError::ElementWait(selector.to_string()));
            }
            std::thread::sleep(ELEMENT_POLL_INTERVAL);
        }
    }

    pub fn is_displayed(&self, element: &Element) -> Result<bool, WebDriverError> {
        let value = self.query(&format!("/element/{}/displayed", element.id))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub fn attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let value = self.query(&format!("/element/{}/attribute/{}", element.id, name))?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Click an element; an intercepted click is retried via programmatic
    /// dispatch rather than surfaced as an error.
    pub fn click(&self, element: &Element) -> Result<ClickOutcome, WebDriverError> {
        match self.command(&format!("/element/{}/click", element.id), None) {
            Ok(_) => Ok(ClickOutcome::Clicked),
            Err(WebDriverError::ClickIntercepted(message)) => {
                debug!("Click intercepted ({message}); dispatching via script");
                self.execute("arguments[0].click();", vec![element.to_arg()])?;
                Ok(ClickOutcome::InterceptedRetriedViaScript)
            }
            Err(e) => Err(e),
        }
    }

    /// Execute synchronous JavaScript in the page.
    pub fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, WebDriverError> {
        self.command(
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
    }

    /// Tear the session down. Errors are logged, not propagated; the
    /// session may already be gone.
    pub fn quit(&mut self) {
        let url = format!("{}/session/{}", self.endpoint, self.session_id);
        if let Err(e) = self.http.delete(&url).send() {
            warn!("Failed to close WebDriver session: {e}");
        }
    }
}
