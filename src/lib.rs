mod parser;
pub mod scraper;
pub mod selectors;
pub mod types;

pub use parser::{ParseError, parse_profile};
pub use self::scraper::{HttpTransport, RawResponse, ScraperError, Transport, WebScraper};
pub use selectors::{CompiledSelectors, ProfileSelectors};
pub use types::{ProblemId, ScrapeResult, ScrapeStats};

pub const BASE_URL: &str = "https://acmicpc.net";
