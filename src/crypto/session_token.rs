use std::fmt;
use std::str::FromStr;

use hmac::Mac;

use serde::{Deserialize, Serialize};

use chrono::{DateTime, Duration, TimeZone, Utc};

use base64::{
    alphabet,
    engine::{self, general_purpose},
    Engine as _,
};

use uuid::Uuid;

use super::signing_key::HmacSha256;

lazy_static::lazy_static! {
    static ref BASE64_ENGINE: engine::GeneralPurpose =
        engine::GeneralPurpose::new(&alphabet::URL_SAFE, general_purpose::NO_PAD);
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature does not match")]
    SignatureMismatch,
    #[error("Token is expired")]
    Expired,
    #[error("Failed to decode or encode token")]
    DecodeEncodeError,
}

impl From<serde_json::Error> for TokenError {
    fn from(_e: serde_json::Error) -> Self {
        Self::DecodeEncodeError
    }
}

impl From<base64::DecodeError> for TokenError {
    fn from(_e: base64::DecodeError) -> Self {
        Self::DecodeEncodeError
    }
}

pub type TokenResult<T> = Result<T, TokenError>;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// The authenticated user
    sub: Uuid,
    /// Expiry as a unix timestamp
    exp: i64,
}

/// A signed bearer token identifying a user: `<base64 claims>.<base64 hmac>`
#[derive(Clone, PartialEq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a token for `user_id` that stays valid for `ttl`
    pub fn issue(key: &HmacSha256, user_id: Uuid, ttl: Duration) -> TokenResult<Self> {
        Self::issue_until(key, user_id, Utc::now() + ttl)
    }

    pub fn issue_until(
        key: &HmacSha256,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> TokenResult<Self> {
        let claims = SessionClaims {
            sub: user_id,
            exp: expires_at.timestamp(),
        };
        let msg = serde_json::to_vec(&claims)?;
        let sig = sign_message(key, &msg);

        Ok(Self(format!(
            "{}.{}",
            BASE64_ENGINE.encode(msg),
            BASE64_ENGINE.encode(sig)
        )))
    }

    /// Verify the signature and expiry, returning the user the token was issued to
    pub fn verify(&self, key: &HmacSha256) -> TokenResult<Uuid> {
        let (msg, sig) = self.split().ok_or(TokenError::DecodeEncodeError)?;
        let msg = BASE64_ENGINE.decode(msg)?;
        let sig = BASE64_ENGINE.decode(sig)?;

        verify_message(key, &msg, &sig)?;

        let claims: SessionClaims = serde_json::from_slice(&msg)?;
        if is_expired(claims.exp) {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }

    fn split(&self) -> Option<(&str, &str)> {
        let mut matches = self.0.splitn(2, '.');
        let msg = matches.next()?;
        let sig = matches.next()?;
        Some((msg, sig))
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionToken {
    type Err = TokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::DecodeEncodeError);
        }
        Ok(Self(token.to_string()))
    }
}

// Tokens are credentials, keep them out of logs
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

fn is_expired(exp: i64) -> bool {
    Utc.timestamp_opt(exp, 0u32)
        .earliest()
        .map(|exp| Utc::now() >= exp)
        // An unrepresentable timestamp is treated as expired
        .unwrap_or(true)
}

fn sign_message(key: &HmacSha256, msg: &[u8]) -> Vec<u8> {
    key.clone().chain_update(msg).finalize().into_bytes().to_vec()
}

fn verify_message(key: &HmacSha256, msg: &[u8], signature: &[u8]) -> TokenResult<()> {
    key.clone()
        .chain_update(msg)
        .verify_slice(signature)
        .map_err(|_| TokenError::SignatureMismatch)
}
