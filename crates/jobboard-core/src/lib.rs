//! Job board session client.
//!
//! Holds the authentication lifecycle of the job board front-end: logging in,
//! registering job seekers and companies, keeping the session token fresh and
//! persisted in the `auth` cookie, and logging out.
//!
//! - [`api`]: REST client for the backend
//! - [`auth`]: session value, token decoding and cookie persistence
//! - [`controller`]: forms, validation, route guard and revalidation timer
//! - [`navbar`]: navigation entries and job search box
//! - [`routes`]: application routes and the navigator redirects go through

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod navbar;
pub mod routes;
pub mod utils;

pub use config::Config;
