use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::fetch_error::FetchError;
use crate::fetcher::StructuredFetcher;
use crate::models::ResponseEnvelope;
use crate::transport::Transport;

/// Reissue `fetch` every `interval` until `token` is cancelled. Each
/// successful envelope is handed to `on_envelope`. Returns the number of
/// successful fetches.
///
/// A zero `interval` or an invalid endpoint stops polling without
/// retrying.
#[instrument(skip(fetcher, token, on_envelope), fields(interval_secs = interval.as_secs()))]
pub async fn run_polling<T, F>(
    fetcher: &StructuredFetcher<T>,
    endpoint: &str,
    interval: Duration,
    token: CancellationToken,
    mut on_envelope: F,
) -> usize
where
    T: Transport,
    F: FnMut(&ResponseEnvelope),
{
    if interval.is_zero() {
        error!("Polling interval must be non-zero, not starting scheduler");
        return 0;
    }

    let mut ticker = time::interval(interval);
    let mut successes = 0;

    info!("Polling scheduler started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        debug!("Scheduler tick - initiating fetch");

        match fetcher.fetch_with_cancel(endpoint, &token).await {
            Ok(envelope) => {
                successes += 1;
                info!(
                    "Fetched {} constructors for season {}",
                    envelope.table.constructors.len(),
                    envelope.table.season
                );
                on_envelope(&envelope);
            }
            Err(FetchError::Cancelled) => break,
            Err(e @ FetchError::InvalidEndpoint(_)) => {
                error!("Stopping scheduler: {}", e);
                break;
            }
            Err(e) => {
                error!("Failed to fetch constructors: {}", e);
            }
        }
    }

    info!("Polling scheduler stopped after {} successful fetches", successes);
    successes
}
