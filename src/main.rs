use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use constructor_fetcher::config::Config;
use constructor_fetcher::fetcher::{constructors_url, StructuredFetcher};
use constructor_fetcher::models::ResponseEnvelope;
use constructor_fetcher::scheduler;
use constructor_fetcher::transport::HttpTransport;

#[derive(Parser, Debug)]
#[command(name = "constructor-fetcher")]
#[command(about = "Fetch and decode the Formula 1 constructors listing", long_about = None)]
struct Cli {
    /// Endpoint to fetch (defaults to the 2021 listing)
    #[arg(long, env = "CONSTRUCTORS_URL")]
    url: Option<String>,

    /// Season to fetch, e.g. 2021; takes precedence over --url
    #[arg(long)]
    season: Option<String>,

    /// Poll every N minutes until Ctrl-C instead of fetching once
    #[arg(long, env = "FETCH_INTERVAL_MINUTES")]
    interval_minutes: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Print the decoded envelope as JSON
    #[arg(long)]
    json: bool,
}

fn print_envelope(envelope: &ResponseEnvelope, as_json: bool) {
    if as_json {
        match envelope.to_wire_json() {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("Failed to serialize envelope: {}", e),
        }
        return;
    }

    println!(
        "Season {} ({} of {} constructors, offset {})",
        envelope.table.season,
        envelope.table.constructors.len(),
        envelope.total,
        envelope.offset
    );
    for constructor in &envelope.table.constructors {
        println!(
            "  {:<16} {:<24} {}",
            constructor.constructor_id, constructor.name, constructor.nationality
        );
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,constructor_fetcher=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // CLI flags override the environment
    let mut config = Config::from_env();
    if let Some(season) = cli.season.as_deref() {
        config.constructors_url = constructors_url(season);
    } else if let Some(url) = cli.url {
        config.constructors_url = url;
    }
    if cli.timeout_secs.is_some() {
        config.request_timeout_secs = cli.timeout_secs;
    }
    if let Some(minutes) = cli.interval_minutes {
        config.set_fetch_interval_minutes(minutes);
        if config.fetch_interval_minutes.is_none() {
            warn!("Ignoring unusable interval of {} minutes, fetching once", minutes);
        }
    }
    info!("Starting constructor fetcher with config: {:?}", config);

    let transport = match config.request_timeout() {
        Some(timeout) => HttpTransport::with_timeout(timeout)?,
        None => HttpTransport::new(),
    };
    let fetcher = StructuredFetcher::new(transport);

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, cancelling");
            ctrl_c_token.cancel();
        }
    });

    match config.fetch_interval() {
        Some(interval) => {
            scheduler::run_polling(
                &fetcher,
                &config.constructors_url,
                interval,
                token,
                |envelope| print_envelope(envelope, cli.json),
            )
            .await;
        }
        None => {
            let envelope = fetcher
                .fetch_with_cancel(&config.constructors_url, &token)
                .await?;
            print_envelope(&envelope, cli.json);
        }
    }

    Ok(())
}
