use std::future::Future;
use std::io::Write;
use std::time::Duration;

use crate::parser::{ParseError, parse_profile};
use crate::selectors::{CompiledSelectors, ProfileSelectors};
use crate::types::ScrapeResult;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// The judge sits behind a bot check that rejects obviously scripted clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Status and body of a fetched page.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Fetches pages for a [`WebScraper`].
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, ScraperError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        let mut builder = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, ScraperError>> + Send {
        async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .inspect_err(|e| log::error!("Decode error: {e:?}"))?;
            Ok(RawResponse { status, body })
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebScraper<T = HttpTransport> {
    transport: T,
    base_url: String,
    selectors: CompiledSelectors,
}

impl WebScraper<HttpTransport> {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_transport(
            HttpTransport::new(Some(DEFAULT_TIMEOUT))?,
            crate::BASE_URL,
            &ProfileSelectors::default(),
        )
    }
}

impl<T: Transport> WebScraper<T> {
    pub fn with_transport(
        transport: T,
        base_url: impl Into<String>,
        selectors: &ProfileSelectors,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.into();
        if !base_url.starts_with("http") {
            return Err(ScraperError::Config(format!(
                "Base URL must be http(s): {base_url}"
            )));
        }

        Ok(Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            selectors: selectors.compile()?,
        })
    }

    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/user/{}", self.base_url, username)
    }

    /// Fetches and parses a user's profile.
    ///
    /// Returns `Ok(None)` when the judge answers 403. Every other status is
    /// parsed as-is.
    pub async fn scrape_user(&self, username: &str) -> Result<Option<ScrapeResult>, ScraperError> {
        let url = self.profile_url(username);
        log::info!("Fetching profile: {}", url);

        let response = self.transport.get(&url).await?;

        if response.status == StatusCode::FORBIDDEN {
            log::info!("Blocked by {} (403), skipping {}", self.base_url, username);
            return Ok(None);
        }
        if !response.status.is_success() {
            log::warn!("Unexpected status {} for {}, parsing anyway", response.status, url);
        }

        let result = parse_profile(&response.body, &self.selectors)?;
        log::info!(
            "Scraped {}: {} solved, {} wrong",
            username,
            result.solved.len(),
            result.wrong.len()
        );
        Ok(Some(result))
    }

    /// Scrapes `username` and writes the result as one line of JSON.
    ///
    /// Nothing is written when the profile is blocked; the return value tells
    /// whether a line was emitted.
    pub async fn scrape_user_to<W: Write>(
        &self,
        username: &str,
        out: &mut W,
    ) -> Result<bool, ScraperError> {
        let Some(result) = self.scrape_user(username).await? else {
            return Ok(false);
        };
        serde_json::to_writer(&mut *out, &result)?;
        writeln!(out)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeTransport {
        status: StatusCode,
        body: String,
        requested: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new(status: StatusCode, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, ScraperError>> + Send {
            self.requested.lock().unwrap().push(url.to_string());
            let response = RawResponse {
                status: self.status,
                body: self.body.clone(),
            };
            async move { Ok(response) }
        }
    }

    #[derive(Debug)]
    struct UnreachableTransport;

    impl Transport for UnreachableTransport {
        fn get(&self, _url: &str) -> impl Future<Output = Result<RawResponse, ScraperError>> + Send {
            async move {
                Err(ScraperError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )))
            }
        }
    }

    const PAGE: &str = r#"
        <div class="solved"><a>1000</a><a>1001</a></div>
        <div class="wrong"><a>1002</a></div>
    "#;

    fn fake_scraper(transport: FakeTransport) -> WebScraper<FakeTransport> {
        WebScraper::with_transport(
            transport,
            "https://judge.test/",
            &ProfileSelectors::new("div.solved a", "div.wrong a"),
        )
        .expect("Failed to build scraper")
    }

    #[tokio::test]
    async fn test_requests_user_profile_url() {
        let scraper = fake_scraper(FakeTransport::new(StatusCode::OK, PAGE));

        scraper.scrape_user("boj_user").await.unwrap();

        let requested = scraper.transport.requested.lock().unwrap();
        assert_eq!(*requested, vec!["https://judge.test/user/boj_user".to_string()]);
    }

    #[tokio::test]
    async fn test_scrape_user_ok() {
        let scraper = fake_scraper(FakeTransport::new(StatusCode::OK, PAGE));

        let result = scraper.scrape_user("boj_user").await.unwrap();

        assert_eq!(result, Some(ScrapeResult::new(vec![1000, 1001], vec![1002])));
    }

    #[tokio::test]
    async fn test_forbidden_yields_no_result_and_no_output() {
        let scraper = fake_scraper(FakeTransport::new(StatusCode::FORBIDDEN, PAGE));
        let mut out = Vec::new();

        let written = scraper.scrape_user_to("boj_user", &mut out).await.unwrap();

        assert!(!written);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_status_is_still_parsed() {
        let scraper = fake_scraper(FakeTransport::new(StatusCode::NOT_FOUND, PAGE));

        let result = scraper.scrape_user("boj_user").await.unwrap();

        assert_eq!(result, Some(ScrapeResult::new(vec![1000, 1001], vec![1002])));
    }

    #[tokio::test]
    async fn test_empty_page_still_emits_json() {
        let scraper = fake_scraper(FakeTransport::new(StatusCode::OK, "<html></html>"));
        let mut out = Vec::new();

        let written = scraper.scrape_user_to("boj_user", &mut out).await.unwrap();

        assert!(written);
        assert_eq!(String::from_utf8(out).unwrap(), "{\"solved\":[],\"wrong\":[]}\n");
    }

    #[tokio::test]
    async fn test_writes_single_json_line() {
        let scraper = fake_scraper(FakeTransport::new(StatusCode::OK, PAGE));
        let mut out = Vec::new();

        scraper.scrape_user_to("boj_user", &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"solved\":[1000,1001],\"wrong\":[1002]}\n"
        );
    }

    #[tokio::test]
    async fn test_non_numeric_entry_writes_nothing() {
        let page = r#"<div class="solved"><a>1000</a><a>N/A</a></div>"#;
        let scraper = fake_scraper(FakeTransport::new(StatusCode::OK, page));
        let mut out = Vec::new();

        let err = scraper.scrape_user_to("boj_user", &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            ScraperError::Parse(ParseError::InvalidProblemId { .. })
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let scraper = WebScraper::with_transport(
            UnreachableTransport,
            crate::BASE_URL,
            &ProfileSelectors::default(),
        )
        .unwrap();

        let err = scraper.scrape_user("boj_user").await.unwrap_err();

        assert!(matches!(err, ScraperError::Io(_)));
    }

    #[tokio::test]
    async fn test_default_selectors_against_fixture() {
        let html = fs::read_to_string("fixtures/profile.html")
            .expect("Failed to read fixture HTML file");
        let scraper = WebScraper::with_transport(
            FakeTransport::new(StatusCode::OK, html),
            crate::BASE_URL,
            &ProfileSelectors::default(),
        )
        .unwrap();

        let result = scraper.scrape_user("boj_user").await.unwrap().unwrap();

        assert_eq!(result.solved, vec![1000, 1001, 1008, 2557, 10171]);
        assert_eq!(result.wrong, vec![1003, 9663]);
    }

    #[tokio::test]
    async fn test_default_scraper_targets_judge() {
        let scraper = WebScraper::new().expect("Failed to build default scraper");
        assert_eq!(
            scraper.profile_url("boj_user"),
            "https://acmicpc.net/user/boj_user"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = WebScraper::with_transport(
            FakeTransport::new(StatusCode::OK, PAGE),
            "ftp://judge.test",
            &ProfileSelectors::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_invalid_selector_fails_construction() {
        let err = WebScraper::with_transport(
            FakeTransport::new(StatusCode::OK, PAGE),
            crate::BASE_URL,
            &ProfileSelectors::new("a[", "b"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ScraperError::Parse(ParseError::InvalidSelector { .. })
        ));
    }
}
