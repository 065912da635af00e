use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/tokeninfo";

/// Fields of Google's tokeninfo response that login checks rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleTokenInfo {
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub issued_to: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum TokenVerifierError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Looks up the claims behind a Google Sign-In ID token.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn token_info(&self, id_token: &str) -> Result<GoogleTokenInfo, TokenVerifierError>;
}

pub struct GoogleTokenVerifier {
    client: reqwest::Client,
}

impl GoogleTokenVerifier {
    pub fn new() -> Result<Self, TokenVerifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TokenVerifierError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn token_info(&self, id_token: &str) -> Result<GoogleTokenInfo, TokenVerifierError> {
        let resp = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| TokenVerifierError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TokenVerifierError::BadResponse(format!(
                "tokeninfo returned {}",
                resp.status()
            )));
        }

        resp.json::<GoogleTokenInfo>()
            .await
            .map_err(|e| TokenVerifierError::Parse(e.to_string()))
    }
}
