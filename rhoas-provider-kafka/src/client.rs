//! HTTP client for the Kafka management and admin APIs

use log::debug;
use rhoas_core::provider::BoxFuture;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::api::{
    AclBinding, ApiError, ApiResult, KafkaAdminApi, KafkaMgmtApi, KafkaRequest,
    KafkaRequestPayload,
};
use crate::auth::{EXPIRY_MARGIN, exchange_offline_token};
use crate::config::{OFFLINE_TOKEN_ENV, ProviderConfig};

const KAFKAS_PATH: &str = "/api/kafkas_mgmt/v1/kafkas";
const ACLS_PATH: &str = "/api/v1/acls";

enum Credentials {
    Static(String),
    Offline {
        auth_url: String,
        client_id: String,
        offline_token: String,
    },
}

struct CachedToken {
    token: String,
    refresh_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.refresh_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Client for the Kafka management API and instance admin APIs
pub struct RhoasClient {
    http: reqwest::Client,
    api_url: String,
    credentials: Credentials,
    token: Mutex<Option<CachedToken>>,
}

impl RhoasClient {
    pub fn from_config(config: &ProviderConfig) -> ApiResult<Self> {
        let credentials = match (&config.access_token, &config.offline_token) {
            (Some(token), _) => Credentials::Static(token.clone()),
            (None, Some(offline_token)) => Credentials::Offline {
                auth_url: config.auth_url.clone(),
                client_id: config.client_id.clone(),
                offline_token: offline_token.clone(),
            },
            (None, None) => {
                return Err(ApiError::Auth(format!(
                    "no credentials configured, set {} or provider.access_token",
                    OFFLINE_TOKEN_ENV
                )));
            }
        };

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
        })
    }

    pub fn kafkas_url(&self) -> String {
        format!("{}{}", self.api_url, KAFKAS_PATH)
    }

    pub fn kafka_url(&self, id: &str) -> String {
        format!("{}/{}", self.kafkas_url(), id)
    }

    pub fn acls_url(admin_url: &str) -> String {
        format!("{}{}", admin_url.trim_end_matches('/'), ACLS_PATH)
    }

    /// Current bearer token, exchanging the offline token when needed
    async fn bearer(&self) -> ApiResult<String> {
        let (auth_url, client_id, offline_token) = match &self.credentials {
            Credentials::Static(token) => return Ok(token.clone()),
            Credentials::Offline {
                auth_url,
                client_id,
                offline_token,
            } => (auth_url, client_id, offline_token),
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_fresh()
        {
            return Ok(token.token.clone());
        }

        let fresh = exchange_offline_token(&self.http, auth_url, client_id, offline_token).await?;
        debug!("obtained access token from {}", auth_url);

        let refresh_at = fresh
            .expires_in
            .map(|ttl| Instant::now() + ttl.saturating_sub(EXPIRY_MARGIN));
        *cached = Some(CachedToken {
            token: fresh.token.clone(),
            refresh_at,
        });
        Ok(fresh.token)
    }
}

/// Turn a non-2xx response into an `ApiError`
async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(
        status.as_u16(),
        status.canonical_reason(),
        &body,
    ))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

impl KafkaMgmtApi for RhoasClient {
    fn create_kafka<'a>(
        &'a self,
        payload: &'a KafkaRequestPayload,
    ) -> BoxFuture<'a, ApiResult<KafkaRequest>> {
        Box::pin(async move {
            let token = self.bearer().await?;
            debug!("POST {} name={}", self.kafkas_url(), payload.name);
            let response = self
                .http
                .post(self.kafkas_url())
                .query(&[("async", "true")])
                .bearer_auth(token)
                .json(payload)
                .send()
                .await
                .map_err(transport)?;
            decode(response).await
        })
    }

    fn get_kafka_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ApiResult<KafkaRequest>> {
        Box::pin(async move {
            let token = self.bearer().await?;
            let response = self
                .http
                .get(self.kafka_url(id))
                .bearer_auth(token)
                .send()
                .await
                .map_err(transport)?;
            decode(response).await
        })
    }

    fn delete_kafka_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            let token = self.bearer().await?;
            debug!("DELETE {}", self.kafka_url(id));
            let response = self
                .http
                .delete(self.kafka_url(id))
                .query(&[("async", "true")])
                .bearer_auth(token)
                .send()
                .await
                .map_err(transport)?;
            check(response).await.map(|_| ())
        })
    }
}

impl KafkaAdminApi for RhoasClient {
    fn create_acl<'a>(
        &'a self,
        admin_url: &'a str,
        binding: &'a AclBinding,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            let token = self.bearer().await?;
            let url = Self::acls_url(admin_url);
            debug!(
                "POST {} principal={} resource={}:{}",
                url, binding.principal, binding.resource_type, binding.resource_name
            );
            let response = self
                .http
                .post(url)
                .bearer_auth(token)
                .json(binding)
                .send()
                .await
                .map_err(transport)?;
            check(response).await.map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_config() -> ProviderConfig {
        ProviderConfig {
            api_url: "https://api.example.com/".to_string(),
            access_token: Some("token".to_string()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn builds_urls() {
        let client = RhoasClient::from_config(&static_config()).unwrap();
        assert_eq!(
            client.kafkas_url(),
            "https://api.example.com/api/kafkas_mgmt/v1/kafkas"
        );
        assert_eq!(
            client.kafka_url("abc"),
            "https://api.example.com/api/kafkas_mgmt/v1/kafkas/abc"
        );
        assert_eq!(
            RhoasClient::acls_url("https://admin.example.com/"),
            "https://admin.example.com/api/v1/acls"
        );
    }

    #[test]
    fn requires_credentials() {
        let result = RhoasClient::from_config(&ProviderConfig::default());
        match result {
            Err(ApiError::Auth(message)) => assert!(message.contains(OFFLINE_TOKEN_ENV)),
            Err(other) => panic!("Expected Auth error, got {:?}", other),
            Ok(_) => panic!("Expected Auth error"),
        }
    }

    #[tokio::test]
    async fn static_token_is_used_as_is() {
        let client = RhoasClient::from_config(&static_config()).unwrap();
        assert_eq!(client.bearer().await.unwrap(), "token");
    }

    #[tokio::test(start_paused = true)]
    async fn cached_token_expires() {
        let token = CachedToken {
            token: "t".to_string(),
            refresh_at: Some(Instant::now() + std::time::Duration::from_secs(10)),
        };
        assert!(token.is_fresh());
        tokio::time::advance(std::time::Duration::from_secs(11)).await;
        assert!(!token.is_fresh());
    }
}
