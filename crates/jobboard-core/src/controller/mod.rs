//! Session controller: the authentication forms, their validation, the route
//! guard and the background revalidation timer.
//!
//! Every remote failure is converted into an [`AuthError`] and recorded on
//! the form that triggered it; nothing is allowed to escape unhandled.

pub mod error;
pub mod forms;
pub mod guard;
pub mod session;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AuthError;
pub use forms::{
    is_strong_password, is_valid_email, CompanyForm, Field, FieldErrors, FormStatus, LoginForm,
    SeekerRegistration,
};
pub use guard::{GuardDecision, RouteGuard};
pub use session::{Revalidation, SessionController};
pub use timer::{RevalidationTimer, DEFAULT_REVALIDATE_INTERVAL};
