use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the cookie carrying the signed session claim
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret is empty")]
    InvalidSecret,

    #[error("Session token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Session expiry of {0} hours is out of range")]
    InvalidExpiry(u64),
}

/// Signed session claim. There is no user identity, only the admin flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub logged_in: bool,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn admin(expiry_hours: u64) -> Result<Self, SessionError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(SessionError::InvalidExpiry(expiry_hours))?;

        Ok(Self {
            logged_in: true,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }
}

/// Issues and verifies session tokens signed with the application secret
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
}

impl SessionSigner {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn expiry_hours(&self) -> u64 {
        self.expiry_hours
    }

    pub fn issue(&self) -> Result<String, SessionError> {
        let claims = SessionClaims::admin(self.expiry_hours)?;
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))
    }

    /// Decode a token; bad signatures, expired tokens and garbage all yield None
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }

    /// True when the request carries a valid claim with the admin flag set
    pub fn is_admin(&self, headers: &HeaderMap) -> bool {
        session_token(headers)
            .and_then(|token| self.verify(token))
            .map(|claims| claims.logged_in)
            .unwrap_or(false)
    }
}

/// Extract the session token from the Cookie header(s)
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Set-Cookie value establishing the session
pub fn session_cookie(token: &str, max_age_hours: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age_hours.saturating_mul(3600)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that makes the browser drop the session
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
