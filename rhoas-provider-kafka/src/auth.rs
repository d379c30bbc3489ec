//! Offline token exchange
//!
//! The management API accepts short-lived bearer tokens. They are obtained by
//! presenting the long-lived offline token to the SSO token endpoint.

use std::time::Duration;

use serde::Deserialize;

use crate::api::{ApiError, ApiResult};

pub const DEFAULT_AUTH_URL: &str = "https://sso.redhat.com/auth/realms/redhat-external";
pub const DEFAULT_CLIENT_ID: &str = "cloud-services";

/// Access tokens are refreshed this long before they expire
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// A bearer token and how long it stays valid
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: Option<Duration>,
}

pub fn token_url(auth_url: &str) -> String {
    format!(
        "{}/protocol/openid-connect/token",
        auth_url.trim_end_matches('/')
    )
}

/// Exchange an offline token for an access token
pub async fn exchange_offline_token(
    http: &reqwest::Client,
    auth_url: &str,
    client_id: &str,
    offline_token: &str,
) -> ApiResult<AccessToken> {
    let response = http
        .post(token_url(auth_url))
        .form(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("refresh_token", offline_token),
        ])
        .send()
        .await
        .map_err(|e| ApiError::Auth(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Auth(format!("{}: {}", status, body)));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Auth(format!("invalid token response: {}", e)))?;

    Ok(AccessToken {
        token: body.access_token,
        expires_in: body.expires_in.map(Duration::from_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_url_trims_trailing_slash() {
        assert_eq!(
            token_url("https://sso.example.com/auth/realms/external/"),
            "https://sso.example.com/auth/realms/external/protocol/openid-connect/token"
        );
    }

    #[test]
    fn decodes_token_response() {
        let body = r#"{"access_token":"abc","expires_in":900,"token_type":"Bearer"}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, Some(900));
    }
}
