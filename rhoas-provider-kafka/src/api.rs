//! Wire types and API traits
//!
//! The Kafka management API and the per-instance admin API are consumed
//! through `KafkaMgmtApi` and `KafkaAdminApi`. `RhoasClient` implements both
//! over HTTP; tests substitute scripted implementations.

use chrono::{DateTime, Utc};
use rhoas_core::provider::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Error code the management API uses for a missing resource
pub const NOT_FOUND_CODE: &str = "KAFKAS-MGMT-7";

/// Body of `POST /api/kafkas_mgmt/v1/kafkas`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KafkaRequestPayload {
    pub name: String,
    pub cloud_provider: String,
    pub region: String,
}

/// A Kafka instance as returned by the management API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaRequest {
    pub id: String,
    pub kind: String,
    pub href: String,
    pub status: Option<String>,
    pub cloud_provider: Option<String>,
    pub multi_az: bool,
    pub region: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub bootstrap_server_host: Option<String>,
    pub admin_api_server_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub failed_reason: Option<String>,
    pub version: Option<String>,
}

impl KafkaRequest {
    pub fn status(&self) -> Status {
        Status::from(self.status.as_deref().unwrap_or_default())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Body of `POST {admin_api_server_url}/api/v1/acls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclBinding {
    pub resource_type: String,
    pub resource_name: String,
    pub pattern_type: String,
    pub principal: String,
    pub operation: String,
    pub permission: String,
}

/// Error document returned by the management API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub href: Option<String>,
    pub code: Option<String>,
    pub reason: Option<String>,
    pub operation_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response
    #[error("{message}")]
    Http {
        status: u16,
        code: Option<String>,
        reason: Option<String>,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

impl ApiError {
    /// Build an error from a non-2xx status and the raw response body
    ///
    /// The message is the status line followed by the remote reason when the
    /// body is a management API error document.
    pub fn from_response(status: u16, canonical_reason: Option<&str>, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let mut message = match canonical_reason {
            Some(text) => format!("{} {}", status, text),
            None => status.to_string(),
        };
        if let Some(reason) = parsed.reason.as_deref().filter(|r| !r.is_empty()) {
            message.push_str(": ");
            message.push_str(reason);
        }
        ApiError::Http {
            status,
            code: parsed.code,
            reason: parsed.reason,
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Http { status, code, .. } => {
                *status == 404 || code.as_deref() == Some(NOT_FOUND_CODE)
            }
            _ => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Kafka management API
pub trait KafkaMgmtApi: Send + Sync {
    /// Request a new instance; the call returns while the instance provisions
    fn create_kafka<'a>(
        &'a self,
        payload: &'a KafkaRequestPayload,
    ) -> BoxFuture<'a, ApiResult<KafkaRequest>>;

    fn get_kafka_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ApiResult<KafkaRequest>>;

    /// Request deletion; the call returns while the instance deprovisions
    fn delete_kafka_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ApiResult<()>>;
}

/// Admin API of a single Kafka instance
pub trait KafkaAdminApi: Send + Sync {
    fn create_acl<'a>(
        &'a self,
        admin_url: &'a str,
        binding: &'a AclBinding,
    ) -> BoxFuture<'a, ApiResult<()>>;
}
