//! REST API client module for the job board backend.
//!
//! This module provides the `ApiClient` for the authentication endpoints
//! (`login`, `adduser`, `jwtValidate`, `auth/google`) and the job title
//! listing used by the search box.
//!
//! Authenticated calls present the session token as a bearer credential.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, AuthApi};
pub use error::ApiError;
pub use types::{AddUserRequest, FederatedLoginRequest, JobListing, LoginRequest, TokenResponse};
