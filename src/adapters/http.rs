use crate::domain::model::ExchangePayload;
use crate::domain::ports::ExchangeSink;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;

const EXCHANGES_PATH: &str = "/api/exchanges";

/// HTTP adapter for the collector backend.
pub struct HttpCollector {
    client: Client,
    endpoint: String,
}

impl HttpCollector {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), EXCHANGES_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExchangeSink for HttpCollector {
    async fn deliver(&self, payload: ExchangePayload) -> Result<()> {
        tracing::debug!("📡 POST {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status();
        // The backend answers 200 on update and 201 on insert.
        if status.as_u16() == 200 || status.as_u16() == 201 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RelayError::CollectorError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_and_path() {
        assert_eq!(
            HttpCollector::new("http://localhost:5000").endpoint(),
            "http://localhost:5000/api/exchanges"
        );
        assert_eq!(
            HttpCollector::new("http://localhost:5000/").endpoint(),
            "http://localhost:5000/api/exchanges"
        );
    }
}
