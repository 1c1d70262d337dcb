use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Free-form transaction metadata, sent to the service as a JSON object.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Meta key that always carries the running exception count.
pub const ERROR_COUNT_KEY: &str = "error_count";

/// Identifies one sync job: `{sync_type}-{vendor}-{credential_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionTag(String);

impl TransactionTag {
    pub fn new(
        sync_type: impl std::fmt::Display,
        vendor: impl std::fmt::Display,
        credential_id: impl std::fmt::Display,
    ) -> Self {
        Self(format!("{sync_type}-{vendor}-{credential_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier the service assigns to a created transaction.
///
/// Opaque to the client. The service may encode it as a JSON number or
/// string; both decode to the same textual form used in URL paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for TransactionId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Body of `POST /transaction`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateTransactionRequest<'a> {
    pub tag: &'a TransactionTag,
    pub start_time: DateTime<Utc>,
    pub meta: Option<&'a Meta>,
}

/// Body of `PUT /transaction/{id}`. Only supplied fields are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UpdateTransactionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<&'a Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_url: Option<&'a str>,
}

/// Response of `POST /transaction`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreatedTransaction {
    pub integration_transaction_id: TransactionId,
    #[serde(flatten)]
    pub extra: Meta,
}

/// Body of `POST /transaction/search`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchQuery {
    pub distinct: &'static str,
    pub order_by: &'static str,
}

impl SearchQuery {
    /// One row per tag, ordered by tag then start time.
    pub const DISTINCT_BY_TAG: SearchQuery = SearchQuery {
        distinct: "tag",
        order_by: "tag,start_time",
    };
}

/// A transaction as stored by the service.
///
/// Timestamps stay in the service's own string form; fields this client
/// does not know about are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub integration_transaction_id: TransactionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
    #[serde(flatten)]
    pub extra: Meta,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Meta, D::Error> {
    Ok(Option::<Meta>::deserialize(deserializer)?.unwrap_or_default())
}
