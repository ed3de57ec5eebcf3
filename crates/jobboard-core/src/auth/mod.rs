//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Session`: a token paired with the identity decoded from it
//! - `SessionStore`: the current session, persisted to the `auth` cookie
//! - `CookieJar`: cookie persistence (file-backed or in-memory)
//!
//! Tokens are decoded but never verified client-side; see [`token`].

pub mod cookie;
pub mod session;
pub mod token;

pub use cookie::{CookieJar, FileCookieJar, MemoryCookieJar, AUTH_COOKIE};
pub use session::{Session, SessionKind, SessionStore};
pub use token::{Role, TokenError, UserIdentity};
