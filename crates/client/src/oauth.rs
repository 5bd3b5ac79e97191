//! OAuth2 token plumbing for the partner API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Authorization endpoint.
pub const AUTH_URL: &str = "https://oauth.facegate.ai/oauth2/authorize";
/// Token endpoint.
pub const TOKEN_URL: &str = "https://oauth.facegate.ai/token";
/// Scope granting full partner-API access.
pub const SCOPE_FULL: &str = "full";

/// Supplies an access token for each outbound request.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> ApiResult<String>;
}

/// Token source around a fixed, pre-issued token.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    /// Creates a source that always returns the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> ApiResult<String> {
        Ok(self.token.clone())
    }
}

/// Token set returned from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// OAuth2 client configuration for the provider.
///
/// The provider expects client credentials in request parameters, not in an
/// Authorization header.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl OAuthConfig {
    /// Creates a configuration for one registered OAuth2 client.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
        }
    }

    /// Builds the browser authorization URL for the `full` scope.
    pub fn auth_url(&self, state: &str) -> String {
        format!(
            "{AUTH_URL}?response_type=code&client_id={}&redirect_uri={}&scope={SCOPE_FULL}&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        http: &reqwest::Client,
        code: &str,
    ) -> ApiResult<TokenSet> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
        ];

        let response = http.post(TOKEN_URL).form(&params).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Token(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}
