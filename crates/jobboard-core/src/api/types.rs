//! Request and response bodies for the job board REST API.

use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// Body for `POST login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST adduser`. Seekers send their names, companies do not.
#[derive(Debug, Clone, Serialize)]
pub struct AddUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lname: Option<String>,
}

/// Body for `POST auth/google`
#[derive(Debug, Clone, Serialize)]
pub struct FederatedLoginRequest {
    pub token: String,
}

/// Success body carrying a session token.
///
/// `adduser` answers with `TokenObject`, every other endpoint with
/// `tokenObject`; both spellings are accepted everywhere. When a body
/// carries both, `tokenObject` wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTokenResponse")]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Deserialize)]
struct RawTokenResponse {
    #[serde(rename = "tokenObject", default)]
    lower: Option<String>,
    #[serde(rename = "TokenObject", default)]
    upper: Option<String>,
}

impl TryFrom<RawTokenResponse> for TokenResponse {
    type Error = String;

    fn try_from(raw: RawTokenResponse) -> Result<Self, Self::Error> {
        raw.lower
            .or(raw.upper)
            .map(|token| TokenResponse { token })
            .ok_or_else(|| "missing field `tokenObject`".to_string())
    }
}

/// A job entry returned by `GET jobTitle/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(rename = "jobTitle", default)]
    pub job_title: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobSearchResponse {
    #[serde(default)]
    pub data: Vec<JobListing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_accepts_both_spellings() {
        let lower: TokenResponse = serde_json::from_str(r#"{"tokenObject":"a.b.c"}"#).unwrap();
        let upper: TokenResponse = serde_json::from_str(r#"{"TokenObject":"d.e.f"}"#).unwrap();
        assert_eq!(lower.token, "a.b.c");
        assert_eq!(upper.token, "d.e.f");
    }

    #[test]
    fn test_token_response_with_both_spellings() {
        let both: TokenResponse =
            serde_json::from_str(r#"{"TokenObject":"old.t.k","tokenObject":"new.t.k"}"#).unwrap();
        assert_eq!(both.token, "new.t.k");
    }

    #[test]
    fn test_token_response_without_token_is_rejected() {
        let err = serde_json::from_str::<TokenResponse>(r#"{"msg":"ok"}"#).unwrap_err();
        assert!(err.to_string().contains("tokenObject"));
    }

    #[test]
    fn test_add_user_request_omits_missing_names() {
        let body = AddUserRequest {
            email: "hr@acme.io".to_string(),
            password: "Secret123".to_string(),
            role: Role::Company,
            fname: None,
            lname: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "hr@acme.io", "password": "Secret123", "role": "Company"})
        );
    }

    #[test]
    fn test_add_user_request_seeker_names() {
        let body = AddUserRequest {
            email: "ann@mail.com".to_string(),
            password: "pw".to_string(),
            role: Role::Seeker,
            fname: Some("Ann".to_string()),
            lname: Some("Lee".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["role"], "Seeker");
        assert_eq!(json["fname"], "Ann");
        assert_eq!(json["lname"], "Lee");
    }

    #[test]
    fn test_job_search_response_keeps_extra_fields() {
        let parsed: JobSearchResponse = serde_json::from_str(
            r#"{"data":[{"jobTitle":"Backend Engineer","company":"Acme"},{"id":7}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(parsed.data[0].fields["company"], "Acme");
        assert_eq!(parsed.data[1].job_title, None);
    }

    #[test]
    fn test_job_search_response_missing_data() {
        let parsed: JobSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_empty());
    }
}
