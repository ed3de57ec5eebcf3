//! Application routes and the navigator abstraction redirects go through.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use url::form_urlencoded;

const SEARCH_PATH: &str = "/jobTitle/search";
const SEARCH_PARAM: &str = "jobTitle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Landing,
    /// `/login`
    Login,
    /// `/seekerRegister`
    SeekerRegister,
    /// `/companyRegister`
    CompanyRegister,
    /// `/registeredSuccessfully`
    RegisteredSuccessfully,
    /// `/jobTitle/search?jobTitle=<query>`
    JobSearch { query: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::SeekerRegister => "/seekerRegister".to_string(),
            Route::CompanyRegister => "/companyRegister".to_string(),
            Route::RegisteredSuccessfully => "/registeredSuccessfully".to_string(),
            Route::JobSearch { query } => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair(SEARCH_PARAM, query)
                    .finish();
                format!("{}?{}", SEARCH_PATH, encoded)
            }
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let (base, query) = match path.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (path, None),
        };

        match base {
            "/" | "" => Some(Route::Landing),
            "/login" => Some(Route::Login),
            "/seekerRegister" => Some(Route::SeekerRegister),
            "/companyRegister" => Some(Route::CompanyRegister),
            "/registeredSuccessfully" => Some(Route::RegisteredSuccessfully),
            SEARCH_PATH => {
                let query = query
                    .into_iter()
                    .flat_map(|q| form_urlencoded::parse(q.as_bytes()))
                    .find(|(key, _)| key == SEARCH_PARAM)
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default();
                Some(Route::JobSearch { query })
            }
            _ => None,
        }
    }

    /// Entry points reachable without a session, where no revalidation
    /// is attempted even if one exists.
    pub fn is_public_entry(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::SeekerRegister | Route::CompanyRegister
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Where redirects are sent.
pub trait Navigator: Send + Sync {
    /// Navigate without leaving a history entry
    fn replace(&self, route: Route);

    /// Navigate, keeping the current route in history
    fn push(&self, route: Route);

    fn current(&self) -> Route;
}

/// In-memory navigation history.
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: Mutex::new(vec![start]),
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl Navigator for History {
    fn replace(&self, route: Route) {
        debug!(route = %route, "replace");
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.pop();
        entries.push(route);
    }

    fn push(&self, route: Route) {
        debug!(route = %route, "push");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }

    fn current(&self) -> Route {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or(Route::Landing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::SeekerRegister.path(), "/seekerRegister");
        assert_eq!(Route::CompanyRegister.path(), "/companyRegister");
        assert_eq!(Route::RegisteredSuccessfully.path(), "/registeredSuccessfully");
    }

    #[test]
    fn test_search_path_is_encoded() {
        let route = Route::JobSearch {
            query: "rust & go dev".to_string(),
        };
        assert_eq!(route.path(), "/jobTitle/search?jobTitle=rust+%26+go+dev");
        assert_eq!(Route::from_path(&route.path()), Some(route));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Landing));
        assert_eq!(Route::from_path("/login"), Some(Route::Login));
        assert_eq!(Route::from_path("/companyRegister"), Some(Route::CompanyRegister));
        assert_eq!(
            Route::from_path("/jobTitle/search"),
            Some(Route::JobSearch { query: String::new() })
        );
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn test_public_entry_routes() {
        assert!(Route::Login.is_public_entry());
        assert!(Route::SeekerRegister.is_public_entry());
        assert!(Route::CompanyRegister.is_public_entry());
        assert!(!Route::Landing.is_public_entry());
        assert!(!Route::RegisteredSuccessfully.is_public_entry());
    }

    #[test]
    fn test_history_replace_and_push() {
        let history = History::new(Route::Login);
        history.replace(Route::Landing);
        assert_eq!(history.entries(), vec![Route::Landing]);

        history.push(Route::JobSearch { query: "qa".to_string() });
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.current(), Route::JobSearch { query: "qa".to_string() });
    }
}
