use crate::routes::Route;

/// What to do when navigating to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Allowed, but the session must be revalidated first
    Revalidate,
    RedirectToLanding,
}

/// One-shot authorization check, evaluated once per navigation transition.
pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(route: &Route, has_session: bool) -> GuardDecision {
        if route.is_public_entry() {
            GuardDecision::Allow
        } else if has_session {
            GuardDecision::Revalidate
        } else if *route == Route::Landing {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectToLanding
        }
    }
}
