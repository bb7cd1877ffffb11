//! search-tool entry point.
//!
//! Searches the web through a real browser and prints the results.
//! Logging goes to stderr so stdout only carries results.

use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use search_tool_client::{SearchTool, open_cache};
use search_tool_core::{AppConfig, ConfigError, Error, SafeSearch, SearchConfig, SearchEngine, TimeRange};
use tracing_subscriber::EnvFilter;

mod output;

use output::Format;

#[derive(Debug, Parser)]
#[command(name = "search-tool", about = "Search the web using various engines.", version)]
struct Cli {
    /// The search query.
    #[arg(required = true)]
    query: Vec<String>,

    /// The search engine to use (google, ddg, brave).
    #[arg(short, long, value_parser = parse_flag::<SearchEngine>)]
    engine: Option<SearchEngine>,

    /// Number of results to fetch.
    #[arg(short = 'n', long)]
    num_results: Option<usize>,

    /// Run the browser in headless mode (default).
    #[arg(long, overrides_with = "no_headless")]
    headless: bool,

    /// Show the browser window.
    #[arg(long, overrides_with = "headless")]
    no_headless: bool,

    /// Interface language, e.g. "en" or "en-US".
    #[arg(long)]
    language: Option<String>,

    /// Region code, e.g. "us".
    #[arg(long)]
    region: Option<String>,

    /// Safe search level (off, moderate, on).
    #[arg(long, value_parser = parse_flag::<SafeSearch>)]
    safe_search: Option<SafeSearch>,

    /// Only return recent results (any, past_day, past_week, past_month, past_year).
    #[arg(long, value_parser = parse_flag::<TimeRange>)]
    time_range: Option<TimeRange>,

    /// Browser User-Agent override.
    #[arg(long)]
    user_agent: Option<String>,

    /// Proxy server for the browser, e.g. "http://127.0.0.1:8080".
    #[arg(long)]
    proxy: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Neither read nor write the result cache.
    #[arg(long)]
    no_cache: bool,

    /// Ignore cached results and search again.
    #[arg(long)]
    refresh: bool,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Apply command-line overrides to the configured defaults.
    fn search_config(&self, app: &AppConfig) -> Result<SearchConfig, ConfigError> {
        let mut config = app.search_config()?;

        if let Some(engine) = self.engine {
            config.search_engine = engine;
        }
        if let Some(num_results) = self.num_results {
            config.num_results = num_results;
        }
        if self.no_headless {
            config.headless = false;
        } else if self.headless {
            config.headless = true;
        }
        if let Some(language) = &self.language {
            config.language = Some(language.clone());
        }
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        if let Some(safe_search) = self.safe_search {
            config.safe_search = safe_search;
        }
        if let Some(time_range) = self.time_range {
            config.time_range = time_range;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = Some(user_agent.clone());
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }

        Ok(config)
    }
}

/// Parse a flag value with the type's `FromStr`, reporting the bare message.
fn parse_flag<T: FromStr<Err = Error>>(value: &str) -> Result<T, String> {
    value.parse().map_err(|e| match e {
        Error::Configuration(msg) => msg,
        other => other.to_string(),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::error_report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = AppConfig::load()?;
    let query = cli.query.join(" ");

    let config = cli.search_config(&app)?;

    // Announce the search as requested, before the count is validated and clamped.
    if cli.format == Format::Text {
        println!("{}", output::header(&config, &query));
    }

    let mut tool = SearchTool::new(config, &app)?.refresh(cli.refresh);
    if app.cache_enabled && !cli.no_cache {
        match open_cache(&app.db_path).await {
            Ok(cache) => tool = tool.with_cache(cache),
            Err(e) => tracing::warn!(path = %app.db_path.display(), "search cache unavailable: {e}"),
        }
    }

    let outcome = tool.search(&query).await;
    if let Err(e) = tool.close().await {
        tracing::warn!("failed to close browser: {e}");
    }
    let results = outcome?;

    match cli.format {
        Format::Text => print!("{}", output::render_text(&results)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    Ok(())
}
