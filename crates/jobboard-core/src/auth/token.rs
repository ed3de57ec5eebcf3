//! Session token payload decoding.
//!
//! The backend issues JWTs. The client only reads the payload segment to learn
//! who is logged in; it never checks the signature. This is a trust boundary:
//! the decoded identity drives what the UI shows, while the backend stays the
//! only authority that accepts or rejects the token on `jwtValidate`.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is not a three-part JWT")]
    Malformed,

    #[error("Token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload is not a valid claim set: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Account role carried in the token's `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Seeker,
    Company,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Seeker => write!(f, "Seeker"),
            Role::Company => write!(f, "Company"),
        }
    }
}

/// Identity decoded from the session token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fname: Option<String>,
    #[serde(default)]
    pub lname: Option<String>,
    /// Expiry as seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
    /// Every other claim, kept verbatim
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl UserIdentity {
    /// Decode the payload of `token` without verifying its signature.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };
        if payload.is_empty() {
            return Err(TokenError::Malformed);
        }

        // Some issuers keep the base64 padding
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Name to greet the user with: full name, else email, else the role.
    pub fn display_name(&self) -> String {
        match (&self.fname, &self.lname) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self
                .email
                .clone()
                .unwrap_or_else(|| self.role.to_string()),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the `exp` claim has passed. Tokens without one never expire
    /// client-side; the backend still has the final word.
    pub fn is_expired(&self) -> bool {
        self.expires_at().map(|at| Utc::now() > at).unwrap_or(false)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.expires_at()
            .map(|at| (at - Utc::now()).num_minutes().max(0))
    }
}

/// Build an unsigned JWT around `claims`. Test helper shared across modules.
#[cfg(test)]
pub(crate) fn encode_test_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.fake_signature", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_company_role() {
        let token = encode_test_token(json!({"role": "Company", "email": "hr@acme.io"}));
        let identity = UserIdentity::decode(&token).unwrap();
        assert_eq!(identity.role, Role::Company);
        assert_eq!(identity.email.as_deref(), Some("hr@acme.io"));
    }

    #[test]
    fn test_decode_seeker_role_keeps_other_claims() {
        let token = encode_test_token(json!({"role": "Seeker", "id": 42, "iat": 1700000000}));
        let identity = UserIdentity::decode(&token).unwrap();
        assert_eq!(identity.role, Role::Seeker);
        assert_eq!(identity.other.get("id"), Some(&json!(42)));
        assert_eq!(identity.other.get("iat"), Some(&json!(1700000000)));
    }

    #[test]
    fn test_decode_tolerates_padding() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"role":"Seeker"}"#);
        let token = format!("{}.{}.sig", header, payload);
        assert_eq!(UserIdentity::decode(&token).unwrap().role, Role::Seeker);
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        assert!(matches!(UserIdentity::decode("invalid_token"), Err(TokenError::Malformed)));
        assert!(matches!(UserIdentity::decode("a..c"), Err(TokenError::Malformed)));
        assert!(matches!(UserIdentity::decode("a.b.c.d"), Err(TokenError::Malformed)));
        assert!(matches!(UserIdentity::decode("a.!!!.c"), Err(TokenError::Encoding(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_role() {
        let token = encode_test_token(json!({"role": "Admin"}));
        assert!(matches!(UserIdentity::decode(&token), Err(TokenError::Claims(_))));

        let token = encode_test_token(json!({"email": "no-role@mail.com"}));
        assert!(matches!(UserIdentity::decode(&token), Err(TokenError::Claims(_))));
    }

    #[test]
    fn test_display_name() {
        let token = encode_test_token(json!({"role": "Seeker", "fname": "Ann", "lname": "Lee"}));
        assert_eq!(UserIdentity::decode(&token).unwrap().display_name(), "Ann Lee");

        let token = encode_test_token(json!({"role": "Company", "email": "hr@acme.io"}));
        assert_eq!(UserIdentity::decode(&token).unwrap().display_name(), "hr@acme.io");

        let token = encode_test_token(json!({"role": "Company"}));
        assert_eq!(UserIdentity::decode(&token).unwrap().display_name(), "Company");
    }

    #[test]
    fn test_expiry() {
        let past = Utc::now().timestamp() - 60;
        let future = Utc::now().timestamp() + 3600;

        let expired = UserIdentity::decode(&encode_test_token(json!({"role": "Seeker", "exp": past}))).unwrap();
        assert!(expired.is_expired());
        assert_eq!(expired.minutes_until_expiry(), Some(0));

        let fresh = UserIdentity::decode(&encode_test_token(json!({"role": "Seeker", "exp": future}))).unwrap();
        assert!(!fresh.is_expired());
        assert!(fresh.minutes_until_expiry().unwrap() >= 58);

        let no_exp = UserIdentity::decode(&encode_test_token(json!({"role": "Seeker"}))).unwrap();
        assert!(!no_exp.is_expired());
        assert_eq!(no_exp.minutes_until_expiry(), None);
    }
}
