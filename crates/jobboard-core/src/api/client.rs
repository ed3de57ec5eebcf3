//! API client for communicating with the job board REST API.
//!
//! This module provides the `AuthApi` trait, the seam the session controller
//! talks through, and `ApiClient`, its reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use super::types::{
    AddUserRequest, FederatedLoginRequest, JobListing, JobSearchResponse, LoginRequest,
    TokenResponse,
};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "login";
const ADD_USER_PATH: &str = "adduser";
const VALIDATE_PATH: &str = "jwtValidate";
const GOOGLE_AUTH_PATH: &str = "auth/google";
const JOB_SEARCH_PATH: &str = "jobTitle/search";

/// Remote operations the session lifecycle depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST login`
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError>;

    /// `POST adduser`
    async fn add_user(&self, request: &AddUserRequest) -> Result<TokenResponse, ApiError>;

    /// `GET jwtValidate` with the token as bearer credential.
    /// Anything but a 200 is an error.
    async fn validate_token(&self, token: &str) -> Result<TokenResponse, ApiError>;

    /// `POST auth/google`
    async fn federated_login(
        &self,
        request: &FederatedLoginRequest,
    ) -> Result<TokenResponse, ApiError>;

    /// `GET jobTitle/search`
    async fn job_titles(&self) -> Result<Vec<JobListing>, ApiError>;
}

/// API client for the job board backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: Self::normalize_base(base_url)?,
        })
    }

    /// Parse the base URL, making sure relative joins append instead of
    /// replacing the last path segment.
    fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
        if base_url.ends_with('/') {
            Ok(Url::parse(base_url)?)
        } else {
            Ok(Url::parse(&format!("{}/", base_url))?)
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Check if response is successful, returning a classified error if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response, url: &Url) -> Result<T, ApiError> {
        response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");

        let response = self.client.post(url.clone()).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse(response, &url).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn add_user(&self, request: &AddUserRequest) -> Result<TokenResponse, ApiError> {
        self.post(ADD_USER_PATH, request).await
    }

    async fn validate_token(&self, token: &str) -> Result<TokenResponse, ApiError> {
        let url = self.endpoint(VALIDATE_PATH)?;
        debug!(%url, "GET (token revalidation)");

        let response = self.client.get(url.clone()).bearer_auth(token).send().await?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        Self::parse(response, &url).await
    }

    async fn federated_login(
        &self,
        request: &FederatedLoginRequest,
    ) -> Result<TokenResponse, ApiError> {
        self.post(GOOGLE_AUTH_PATH, request).await
    }

    async fn job_titles(&self) -> Result<Vec<JobListing>, ApiError> {
        let url = self.endpoint(JOB_SEARCH_PATH)?;
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_response(response).await?;
        let parsed: JobSearchResponse = Self::parse(response, &url).await?;
        debug!(count = parsed.data.len(), "Job titles fetched");
        Ok(parsed.data)
    }
}
