use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::fetch_error::{FetchError, FetchResult};
use crate::models::{ResponseEnvelope, WireDocument};
use crate::transport::{HttpTransport, Transport};

/// Default endpoint: the 2021 constructors listing.
pub const DEFAULT_CONSTRUCTORS_URL: &str = "https://ergast.com/api/f1/2021/constructors.json";

/// Build the constructors endpoint for a given season.
///
/// ```
/// use constructor_fetcher::fetcher::constructors_url;
///
/// assert_eq!(
///     constructors_url("2021"),
///     "https://ergast.com/api/f1/2021/constructors.json"
/// );
/// ```
pub fn constructors_url(season: &str) -> String {
    format!("https://ergast.com/api/f1/{season}/constructors.json")
}

/// Decode a raw response body into an envelope. All-or-nothing: any
/// missing or mistyped field fails the whole document.
pub fn decode_envelope(bytes: &[u8]) -> FetchResult<ResponseEnvelope> {
    let document: WireDocument = serde_json::from_slice(bytes)?;
    Ok(document.mr_data)
}

/// Validate an endpoint string before any network activity.
pub fn parse_endpoint(endpoint: &str) -> FetchResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| FetchError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Issues one GET through its transport and decodes the body into a
/// [`ResponseEnvelope`].
#[derive(Clone)]
pub struct StructuredFetcher<T = HttpTransport> {
    transport: T,
}

impl StructuredFetcher<HttpTransport> {
    pub fn with_http() -> Self {
        Self::new(HttpTransport::new())
    }
}

impl<T: Transport> StructuredFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, endpoint: &str) -> FetchResult<ResponseEnvelope> {
        let url = parse_endpoint(endpoint).inspect_err(|e| warn!("{}", e))?;
        let bytes = self.transport.get(&url).await.map_err(|e| {
            error!("Transport failure: {}", e);
            FetchError::from(e)
        })?;
        self.decode(&bytes)
    }

    /// Like [`fetch`](Self::fetch), but resolves with
    /// [`FetchError::Cancelled`] if `token` fires before the transport
    /// completes.
    #[instrument(skip(self, token))]
    pub async fn fetch_with_cancel(
        &self,
        endpoint: &str,
        token: &CancellationToken,
    ) -> FetchResult<ResponseEnvelope> {
        let url = parse_endpoint(endpoint).inspect_err(|e| warn!("{}", e))?;

        if token.is_cancelled() {
            debug!("Token already cancelled, skipping request");
            return Err(FetchError::Cancelled);
        }

        let bytes = tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("Fetch cancelled before completion");
                return Err(FetchError::Cancelled);
            }
            result = self.transport.get(&url) => result.map_err(|e| {
                error!("Transport failure: {}", e);
                FetchError::from(e)
            })?,
        };

        self.decode(&bytes)
    }

    #[instrument(skip(self, bytes), fields(body_size = bytes.len()))]
    fn decode(&self, bytes: &[u8]) -> FetchResult<ResponseEnvelope> {
        debug!("Decoding response body");
        match decode_envelope(bytes) {
            Ok(envelope) => {
                debug!(
                    "Decoded season {} with {} constructors",
                    envelope.table.season,
                    envelope.table.constructors.len()
                );
                Ok(envelope)
            }
            Err(e) => {
                error!("{}", e);
                debug!(
                    "Body preview (first 200 chars): {}",
                    String::from_utf8_lossy(bytes).chars().take(200).collect::<String>()
                );
                Err(e)
            }
        }
    }
}
