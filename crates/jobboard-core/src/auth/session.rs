use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, PoisonError};

use tracing::{debug, warn};

use super::cookie::{CookieJar, AUTH_COOKIE};
use super::token::{Role, TokenError, UserIdentity};

/// A session token together with the identity decoded from it.
///
/// Only constructible through [`Session::from_token`], so the identity can
/// never drift from the token it was read out of.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    identity: UserIdentity,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Result<Self, TokenError> {
        let token = token.into();
        let identity = UserIdentity::decode(&token)?;
        Ok(Self { token, identity })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn kind(&self) -> SessionKind {
        match self.identity.role {
            Role::Seeker => SessionKind::Seeker,
            Role::Company => SessionKind::Company,
        }
    }
}

/// Who is using the app right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Anonymous,
    Seeker,
    Company,
}

/// Current session, mirrored into the `auth` cookie on every change.
pub struct SessionStore {
    jar: Box<dyn CookieJar>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Anonymous store that persists into `jar`; the jar is not read.
    pub fn new(jar: Box<dyn CookieJar>) -> Self {
        Self {
            jar,
            current: RwLock::new(None),
        }
    }

    /// Restore the session from the `auth` cookie, if there is a usable one.
    pub fn load(jar: Box<dyn CookieJar>) -> Self {
        let restored = match jar.get(AUTH_COOKIE) {
            Ok(Some(token)) => match Session::from_token(token) {
                Ok(session) => {
                    debug!(role = %session.identity.role, "Session restored from cookie");
                    Some(session)
                }
                Err(e) => {
                    warn!(error = %e, "Discarding undecodable auth cookie");
                    if let Err(e) = jar.expire(AUTH_COOKIE) {
                        warn!(error = %e, "Failed to expire auth cookie");
                    }
                    None
                }
            },
            Ok(None) => {
                debug!("No auth cookie found");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read auth cookie");
                None
            }
        };

        Self {
            jar,
            current: RwLock::new(restored),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.jar.set(AUTH_COOKIE, &session.token) {
            warn!(error = %e, "Failed to save auth cookie");
        }
    }

    fn expire_cookie(&self) {
        if let Err(e) = self.jar.expire(AUTH_COOKIE) {
            warn!(error = %e, "Failed to expire auth cookie");
        }
    }

    /// Get the bearer token if a session exists
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.read().as_ref().map(|s| s.identity.clone())
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn kind(&self) -> SessionKind {
        self.read()
            .as_ref()
            .map(Session::kind)
            .unwrap_or(SessionKind::Anonymous)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Replace the session and write the cookie.
    pub fn install(&self, session: Session) {
        let mut current = self.write();
        self.persist(&session);
        *current = Some(session);
    }

    /// Install `session` only while the store still holds `expected_token`.
    /// Returns whether the session was replaced.
    pub fn install_if_current(&self, expected_token: &str, session: Session) -> bool {
        let mut current = self.write();
        if current.as_ref().map(|s| s.token.as_str()) != Some(expected_token) {
            return false;
        }
        self.persist(&session);
        *current = Some(session);
        true
    }

    /// Drop the session and expire the cookie. Returns whether a session
    /// existed; the cookie is expired either way.
    pub fn clear(&self) -> bool {
        let mut current = self.write();
        self.expire_cookie();
        current.take().is_some()
    }

    /// Clear only while the store still holds `expected_token`.
    pub fn clear_if_current(&self, expected_token: &str) -> bool {
        let mut current = self.write();
        if current.as_ref().map(|s| s.token.as_str()) != Some(expected_token) {
            return false;
        }
        self.expire_cookie();
        *current = None;
        true
    }
}
