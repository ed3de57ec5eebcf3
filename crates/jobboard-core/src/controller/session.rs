//! Session lifecycle: login, registration, revalidation and logout.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::error::AuthError;
use super::forms::{
    validate_provider_token, CompanyForm, FieldErrors, FormStatus, LoginForm, SeekerRegistration,
};
use super::guard::{GuardDecision, RouteGuard};
use crate::api::{
    AddUserRequest, ApiError, AuthApi, FederatedLoginRequest, LoginRequest, TokenResponse,
};
use crate::auth::{Role, Session, SessionStore};
use crate::routes::{Navigator, Route};

/// Outcome of a revalidation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidation {
    /// A refreshed token was installed
    Refreshed,
    /// The backend rejected the token and the session was ended
    LoggedOut,
    /// The session changed while the request was in flight; response dropped
    Stale,
    /// No response from the backend; session left as is
    Unreachable,
    NoSession,
}

/// Drives the session store from the outcome of API calls.
pub struct SessionController {
    api: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionController {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // =========================================================================
    // Form operations
    // =========================================================================
    //
    // A form that led to a redirect is reset, as when leaving its page.

    /// Log in with the form's email and password; redirects to landing.
    pub async fn login(&self, form: &mut LoginForm) -> Result<Route, AuthError> {
        let validation = form.validate();
        Self::begin(&mut form.status, validation)?;

        let request = LoginRequest {
            email: form.email.clone(),
            password: form.password.clone(),
        };
        let outcome = self.api.login(&request).await.map_err(AuthError::from_api);

        let result = self.finish("Login", &mut form.status, outcome, Route::Landing);
        if result.is_ok() {
            form.reset();
        }
        result
    }

    /// Register a job seeker; redirects to the confirmation page.
    pub async fn register_seeker(&self, form: &mut SeekerRegistration) -> Result<Route, AuthError> {
        let validation = form.validate();
        Self::begin(&mut form.status, validation)?;

        let request = AddUserRequest {
            email: form.email.clone(),
            password: form.password.clone(),
            role: Role::Seeker,
            fname: Some(form.first_name.clone()),
            lname: Some(form.last_name.clone()),
        };
        let outcome = self
            .api
            .add_user(&request)
            .await
            .map_err(AuthError::from_seeker_registration);

        let result = self.finish(
            "Seeker registration",
            &mut form.status,
            outcome,
            Route::RegisteredSuccessfully,
        );
        if result.is_ok() {
            form.reset();
        }
        result
    }

    /// Register a company account; redirects to the confirmation page.
    pub async fn register_company(&self, form: &mut CompanyForm) -> Result<Route, AuthError> {
        let validation = form.validate();
        Self::begin(&mut form.status, validation)?;

        let request = AddUserRequest {
            email: form.email.clone(),
            password: form.password.clone(),
            role: Role::Company,
            fname: None,
            lname: None,
        };
        let outcome = self
            .api
            .add_user(&request)
            .await
            .map_err(AuthError::from_company_registration);

        let result = self.finish(
            "Company registration",
            &mut form.status,
            outcome,
            Route::RegisteredSuccessfully,
        );
        if result.is_ok() {
            form.reset();
        }
        result
    }

    /// Exchange a third-party identity token for a session; behaves like
    /// `login` once the backend answers.
    pub async fn federated_login(
        &self,
        status: &mut FormStatus,
        provider_token: &str,
    ) -> Result<Route, AuthError> {
        Self::begin(status, validate_provider_token(provider_token))?;

        let request = FederatedLoginRequest {
            token: provider_token.trim().to_string(),
        };
        let outcome = self
            .api
            .federated_login(&request)
            .await
            .map_err(AuthError::from_api);

        let result = self.finish("Federated login", status, outcome, Route::Landing);
        if result.is_ok() {
            status.reset();
        }
        result
    }

    /// Record validation results; on success mark the form as submitting.
    fn begin(status: &mut FormStatus, validation: Result<(), FieldErrors>) -> Result<(), AuthError> {
        match validation {
            Ok(()) => {
                status.errors = FieldErrors::new();
                status.submitting = true;
                Ok(())
            }
            Err(errors) => {
                debug!(fields = errors.len(), "Form rejected by local validation");
                status.errors = errors.clone();
                Err(AuthError::Validation(errors))
            }
        }
    }

    /// Apply a backend answer to the form and the session.
    fn finish(
        &self,
        operation: &'static str,
        status: &mut FormStatus,
        outcome: Result<TokenResponse, AuthError>,
        destination: Route,
    ) -> Result<Route, AuthError> {
        status.submitting = false;

        match outcome.and_then(|response| self.establish(response.token)) {
            Ok(()) => {
                status.back_error = None;
                info!(operation, destination = %destination, "Authentication succeeded");
                self.navigator.replace(destination.clone());
                Ok(destination)
            }
            Err(e) => {
                warn!(operation, error = %e, "Authentication failed");
                status.back_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Decode and install a token issued by the backend.
    fn establish(&self, token: String) -> Result<(), AuthError> {
        let session = Session::from_token(token).map_err(|e| {
            error!(error = %e, "Backend issued an undecodable token");
            AuthError::InvalidToken
        })?;
        debug!(role = %session.identity().role, "Installing session");
        self.store.install(session);
        Ok(())
    }

    // =========================================================================
    // Session maintenance
    // =========================================================================

    /// Exchange the current token for a fresh one. A late answer for a token
    /// that is no longer current is dropped.
    pub async fn revalidate_token(&self) -> Revalidation {
        let Some(issued) = self.store.token() else {
            return Revalidation::NoSession;
        };

        match self.api.validate_token(&issued).await {
            Ok(response) => match Session::from_token(response.token) {
                Ok(session) => {
                    if self.store.install_if_current(&issued, session) {
                        debug!("Session token refreshed");
                        Revalidation::Refreshed
                    } else {
                        warn!("Discarding revalidation response for a replaced session");
                        Revalidation::Stale
                    }
                }
                Err(e) => {
                    error!(error = %e, "Revalidation returned an undecodable token");
                    self.expire(&issued)
                }
            },
            Err(ApiError::Network(e)) => {
                warn!(error = %e, "Revalidation request failed, keeping session");
                Revalidation::Unreachable
            }
            Err(e) => {
                info!(error = %e, "Session token rejected");
                self.expire(&issued)
            }
        }
    }

    /// End the session `issued` belongs to, unless it was already replaced.
    fn expire(&self, issued: &str) -> Revalidation {
        if self.store.clear_if_current(issued) {
            info!("Session expired");
            self.navigator.replace(Route::Landing);
            Revalidation::LoggedOut
        } else {
            warn!("Ignoring rejection of a replaced session");
            Revalidation::Stale
        }
    }

    /// Clear the session and cookie, then return to landing. Safe to call
    /// without a session.
    pub fn logout(&self) {
        if self.store.clear() {
            info!("Logged out");
        } else {
            debug!("Logout without an active session");
        }
        self.navigator.replace(Route::Landing);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Run the route guard for a navigation that just landed on `route`.
    /// Returns the route the user ends up on.
    pub async fn on_navigate(&self, route: Route) -> Route {
        match RouteGuard::evaluate(&route, self.store.is_authenticated()) {
            GuardDecision::Allow => route,
            GuardDecision::Revalidate => match self.revalidate_token().await {
                Revalidation::LoggedOut => Route::Landing,
                _ => route,
            },
            GuardDecision::RedirectToLanding => {
                debug!(route = %route, "No session, redirecting to landing");
                self.navigator.replace(Route::Landing);
                Route::Landing
            }
        }
    }

    /// Push `route` and run the guard for it.
    pub async fn navigate(&self, route: Route) -> Route {
        self.navigator.push(route.clone());
        self.on_navigate(route).await
    }
}
