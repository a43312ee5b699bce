use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use bojscrape::scraper::{DEFAULT_TIMEOUT, HttpTransport, WebScraper};
use bojscrape::{BASE_URL, ProfileSelectors};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "bojscrape")]
#[command(about = "Prints the solved and wrong-answer problems of an acmicpc.net user", long_about = None)]
struct Cli {
    #[arg(help = "Username of the profile to scrape")]
    username: String,

    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "warn",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(
        long,
        value_name = "FILE",
        help = "JSON file overriding the solved/wrong CSS selectors"
    )]
    selectors: Option<PathBuf>,

    #[arg(long, default_value = BASE_URL, help = "Base URL of the judge")]
    base_url: String,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        help = "Request timeout in seconds, 0 waits forever"
    )]
    timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let selectors = match &cli.selectors {
        Some(path) => ProfileSelectors::from_json_file(path).unwrap_or_else(|e| {
            log::error!("Error loading selectors from {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => ProfileSelectors::default(),
    };

    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));

    let scraper = HttpTransport::new(timeout)
        .and_then(|transport| WebScraper::with_transport(transport, &cli.base_url, &selectors))
        .unwrap_or_else(|e| {
            log::error!("Error creating scraper: {}", e);
            process::exit(1);
        });

    match cli.format {
        OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = scraper.scrape_user_to(&cli.username, &mut stdout).await {
                log::error!("Error scraping {}: {}", cli.username, e);
                process::exit(1);
            }
        }
        OutputFormat::Text => {
            let result = scraper
                .scrape_user(&cli.username)
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error scraping {}: {}", cli.username, e);
                    process::exit(1);
                });

            if let Some(result) = result {
                println!("{}", result);
                print!("{}", result.stats());
            }
        }
    }
}
