use std::path::Path;

use anyhow::Context;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::external::google_auth::GoogleTokenInfo;

pub const SESSION_COOKIE: &str = "auth_token";
pub const SESSION_TTL_HOURS: i64 = 24;
const SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("invalid audience: got {got}, expected {expected}")]
    InvalidAudience { got: String, expected: String },
    #[error("invalid issued_to: got {got}, expected {expected}")]
    InvalidIssuedTo { got: String, expected: String },
    #[error("token has expired")]
    Expired,
    #[error("no email in token")]
    NoEmail,
    #[error("COMPANY_DOMAIN not configured")]
    DomainNotConfigured,
    #[error("invalid email format")]
    InvalidEmailFormat,
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("failed to verify token: {0}")]
    Verification(String),
    #[error("session creation failed: {0}")]
    Jwt(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 keys for the session cookie.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Jwt(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn decode_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| text.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

fn valid_secret(hex: &str) -> Option<Vec<u8>> {
    decode_hex(hex).filter(|secret| secret.len() == SECRET_LEN)
}

/// Session secret from `JWT_SECRET`, else from `path`, else freshly generated and written to
/// `path`. A secret of the wrong length or bad hex falls through to the next source.
pub async fn load_or_generate_secret(env_secret: Option<&str>, path: &Path) -> anyhow::Result<Vec<u8>> {
    if let Some(hex) = env_secret {
        match valid_secret(hex) {
            Some(secret) => {
                info!("JWT secret loaded from environment variable");
                return Ok(secret);
            }
            None => warn!("JWT_SECRET in environment is invalid, trying secret file"),
        }
    }

    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read JWT secret file {}", path.display()))?;
        match valid_secret(&contents) {
            Some(secret) => {
                info!("JWT secret loaded from file");
                return Ok(secret);
            }
            None => warn!("Invalid JWT secret in file, generating new one"),
        }
    }

    let mut secret = vec![0u8; SECRET_LEN];
    rand::rng().fill(secret.as_mut_slice());

    match write_secret_file(path, &encode_hex(&secret)).await {
        Ok(()) => info!("New JWT secret generated and saved to {}", path.display()),
        Err(e) => warn!("Failed to save JWT secret to file: {}", e),
    }

    Ok(secret)
}

async fn write_secret_file(path: &Path, hex: &str) -> std::io::Result<()> {
    tokio::fs::write(path, hex).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    Ok(())
}

/// Accept a Google token only if it was minted for this client, is still live, and belongs to
/// an allowed account. `company_domain` starting with `@` allows a whole domain; anything else
/// must match the email exactly. Returns the signed-in email.
pub fn check_token_info(
    info: &GoogleTokenInfo,
    client_id: &str,
    company_domain: &str,
) -> Result<String, AuthError> {
    if info.audience != client_id {
        return Err(AuthError::InvalidAudience {
            got: info.audience.clone(),
            expected: client_id.to_string(),
        });
    }
    if info.issued_to != client_id {
        return Err(AuthError::InvalidIssuedTo {
            got: info.issued_to.clone(),
            expected: client_id.to_string(),
        });
    }
    if info.expires_in <= 0 {
        return Err(AuthError::Expired);
    }

    let email = match info.email.as_deref() {
        Some(email) if !email.is_empty() => email,
        _ => return Err(AuthError::NoEmail),
    };

    if company_domain.is_empty() {
        return Err(AuthError::DomainNotConfigured);
    }

    if let Some(expected_domain) = company_domain.strip_prefix('@') {
        let mut parts = email.split('@');
        let (Some(_), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AuthError::InvalidEmailFormat);
        };
        if domain != expected_domain {
            return Err(AuthError::InvalidDomain(domain.to_string()));
        }
    } else if email != company_domain {
        return Err(AuthError::InvalidEmail(email.to_string()));
    }

    Ok(email.to_string())
}

/// `Set-Cookie` value for the session cookie. A negative `max_age` deletes it.
pub fn session_cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        value,
        max_age.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of the cookie called `name` in the request's `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
