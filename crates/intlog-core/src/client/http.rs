use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::TransactionApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{
    CreateTransactionRequest, CreatedTransaction, ExceptionBatch, ExceptionRecord, Meta,
    SearchQuery, Transaction, TransactionId, TransactionTag, UpdateTransactionRequest,
};

/// Blocking HTTP client for the logging service.
///
/// Holds no per-transaction state; clones share one connection pool, so a
/// single client can back any number of recorders.
#[derive(Debug, Clone)]
pub struct LoggingServiceClient {
    http: Client,
    config: ClientConfig,
}

impl LoggingServiceClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_http_client(builder.build()?, config))
    }

    /// Use an existing `reqwest` client, e.g. one shared with other services.
    pub fn with_http_client(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Join `segments` onto the service host, percent-encoding each one so
    /// an id can never add path levels.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let host = self.config.host()?;
        let mut url = Url::parse(host)
            .map_err(|e| ClientError::Config(format!("Invalid service host '{host}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("Service host '{host}' cannot be a base URL")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, url: Url) -> Result<Response, ClientError> {
        let response = request.send()?;
        let status = response.status();
        debug!(%url, %status, "logging service responded");
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        response
            .json()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl TransactionApi for LoggingServiceClient {
    fn create_transaction(
        &self,
        tag: &TransactionTag,
        start_time: DateTime<Utc>,
        meta: Option<&Meta>,
    ) -> Result<CreatedTransaction, ClientError> {
        let url = self.url(&["transaction"])?;
        let body = CreateTransactionRequest {
            tag,
            start_time,
            meta,
        };
        debug!(%tag, "POST {url}");
        let response = self.send(self.http.post(url.clone()).json(&body), url)?;
        Self::decode(response)
    }

    fn update_transaction(
        &self,
        id: &TransactionId,
        end_time: Option<DateTime<Utc>>,
        meta: Option<&Meta>,
        response_url: Option<&str>,
    ) -> Result<(), ClientError> {
        let url = self.url(&["transaction", id.as_str()])?;
        let body = UpdateTransactionRequest {
            end_time,
            meta,
            response_url,
        };
        debug!("PUT {url}");
        self.send(self.http.put(url.clone()).json(&body), url)?;
        Ok(())
    }

    fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, ClientError> {
        let url = self.url(&["transaction", id.as_str()])?;
        debug!("GET {url}");
        let response = self.send(self.http.get(url.clone()), url)?;
        Self::decode(response)
    }

    fn search_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let url = self.url(&["transaction", "search"])?;
        debug!("POST {url}");
        let response = self.send(
            self.http.post(url.clone()).json(&SearchQuery::DISTINCT_BY_TAG),
            url,
        )?;
        Self::decode(response)
    }

    fn create_transaction_exceptions(
        &self,
        id: &TransactionId,
        exceptions: &[ExceptionRecord],
    ) -> Result<(), ClientError> {
        let url = self.url(&["transaction", id.as_str(), "exception"])?;
        debug!(count = exceptions.len(), "POST {url}");
        self.send(
            self.http.post(url.clone()).json(&ExceptionBatch { exceptions }),
            url,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_operations_require_host() {
        let client = LoggingServiceClient::new(ClientConfig::default()).unwrap();
        let id = TransactionId::from(1);
        let tag = TransactionTag::new("daily_sync", "acme", "cred-1");

        assert!(matches!(
            client.create_transaction(&tag, Utc::now(), None),
            Err(ClientError::NotInitialized)
        ));
        assert!(matches!(
            client.update_transaction(&id, None, None, None),
            Err(ClientError::NotInitialized)
        ));
        assert!(matches!(
            client.get_transaction(&id),
            Err(ClientError::NotInitialized)
        ));
        assert!(matches!(
            client.search_transactions(),
            Err(ClientError::NotInitialized)
        ));
        assert!(matches!(
            client.create_transaction_exceptions(&id, &[]),
            Err(ClientError::NotInitialized)
        ));
    }

    #[test]
    fn test_url_building() {
        let client =
            LoggingServiceClient::new(ClientConfig::new("http://logs.local:9000/")).unwrap();
        assert_eq!(
            client
                .url(&["transaction", "42", "exception"])
                .unwrap()
                .as_str(),
            "http://logs.local:9000/transaction/42/exception"
        );
    }

    #[test]
    fn test_url_keeps_host_base_path() {
        let client =
            LoggingServiceClient::new(ClientConfig::new("https://example.com/logs/v1")).unwrap();
        assert_eq!(
            client.url(&["transaction", "search"]).unwrap().as_str(),
            "https://example.com/logs/v1/transaction/search"
        );
    }

    #[test]
    fn test_url_escapes_id_segment() {
        let client = LoggingServiceClient::new(ClientConfig::new("http://logs.local")).unwrap();
        assert_eq!(
            client.url(&["transaction", "a/b?c"]).unwrap().as_str(),
            "http://logs.local/transaction/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let client = LoggingServiceClient::new(ClientConfig::new("logs.local")).unwrap();
        assert!(matches!(
            client.url(&["transaction"]),
            Err(ClientError::Config(_))
        ));
    }
}
