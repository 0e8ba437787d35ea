use tracing::info;

use crate::config::SourceConfig;
use crate::data::Quote;
use crate::errors::QuoteError;
use crate::source::QuoteSource;
use crate::source::payload::parse_quote_payload;

/// Quote source backed by a single blocking GET to a quote-list endpoint.
///
/// Non-2xx responses, transport failures, and unparseable bodies all surface
/// as `QuoteError::Network`. No timeout is imposed beyond the transport's own.
pub struct HttpQuoteSource {
    config: SourceConfig,
}

impl Default for HttpQuoteSource {
    fn default() -> Self {
        Self::new(SourceConfig::default())
    }
}

impl HttpQuoteSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn network_error(&self, reason: String) -> QuoteError {
        QuoteError::Network {
            source_id: self.config.source_id.clone(),
            reason,
        }
    }
}

impl QuoteSource for HttpQuoteSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn fetch_all(&self) -> Result<Vec<Quote>, QuoteError> {
        info!(
            "[quote_galaxy:source] fetching quotes from {}",
            self.config.endpoint
        );
        // Statuses are checked below so 4xx/5xx keep their code in the reason.
        let response = ureq::get(&self.config.endpoint)
            .config()
            .http_status_as_error(false)
            .build()
            .call()
            .map_err(|err| self.network_error(format!("failed querying quote endpoint: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.network_error(format!("quote endpoint returned status {status}")));
        }
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| self.network_error(format!("failed reading quote response body: {err}")))?;
        let quotes = parse_quote_payload(&body)
            .map_err(|err| self.network_error(format!("malformed quote payload: {err}")))?;
        info!(
            "[quote_galaxy:source] fetched {} quotes from '{}'",
            quotes.len(),
            self.config.source_id
        );
        Ok(quotes)
    }
}
