use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claims we read from an ID token payload. Unknown claims are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since epoch
    pub exp: Option<i64>,
    /// Issued-at, seconds since epoch
    pub iat: Option<i64>,
    pub sub: Option<String>,
    /// Firebase repeats the uid here alongside `sub`
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl TokenClaims {
    pub fn uid(&self) -> Option<&str> {
        self.sub.as_deref().or(self.user_id.as_deref())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Bearer token persisted for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the JWT payload without verifying the signature.
    ///
    /// Returns `None` for anything that is not `header.payload.signature`
    /// with a base64url JSON payload.
    pub fn decode_claims(&self) -> Option<TokenClaims> {
        let mut parts = self.0.split('.');
        let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            debug!("Token has more than three segments");
            return None;
        }

        let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "Token payload is not base64url");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Token payload is not a JSON object");
                None
            }
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.decode_claims().and_then(|c| c.expires_at())
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Build an unsigned token carrying `claims`. Used by tests and local tooling.
pub fn encode_unsigned(claims: &serde_json::Value) -> SessionToken {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    SessionToken(format!("{}.{}.", header, payload))
}
