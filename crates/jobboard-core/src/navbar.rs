//! Navigation bar model: which entries each kind of session sees, the job
//! search box and the job title list that backs its suggestions.

use tracing::{debug, warn};

use crate::api::{AuthApi, JobListing};
use crate::auth::SessionKind;
use crate::routes::{Navigator, Route};
use crate::utils::contains_ignore_case;

/// Placeholder shown until users can upload a picture
pub const BLANK_PROFILE_PICTURE: &str = "/assets/profile/blank-profile-picture.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    /// A link; entries without a route are not wired to a page yet
    Link {
        label: &'static str,
        route: Option<Route>,
    },
    SearchBox,
    ProfilePicture { src: &'static str },
    Logout,
}

pub struct Navbar;

impl Navbar {
    pub fn for_session(kind: SessionKind) -> Vec<NavEntry> {
        let link = |label, route| NavEntry::Link { label, route };
        let picture = NavEntry::ProfilePicture {
            src: BLANK_PROFILE_PICTURE,
        };

        match kind {
            SessionKind::Anonymous => vec![
                link("Login", Some(Route::Login)),
                link("Register as job seeker", Some(Route::SeekerRegister)),
                link("Register as company", Some(Route::CompanyRegister)),
            ],
            SessionKind::Seeker => vec![
                link("Job Browser", None),
                link("Saved", None),
                link("Applications", None),
                NavEntry::SearchBox,
                picture,
                NavEntry::Logout,
            ],
            SessionKind::Company => vec![
                link("Post a job", None),
                link("Applicants", None),
                picture,
                NavEntry::Logout,
            ],
        }
    }
}

/// The navbar search input.
#[derive(Debug, Clone, Default)]
pub struct SearchBox {
    pub query: String,
}

impl SearchBox {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Navigate to the search results, only for a non-blank query.
    /// Returns the route navigated to.
    pub fn submit(&self, navigator: &dyn Navigator) -> Option<Route> {
        let query = self.query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return None;
        }
        let route = Route::JobSearch {
            query: query.to_string(),
        };
        navigator.push(route.clone());
        Some(route)
    }
}

/// Job titles prefetched for search suggestions.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    jobs: Vec<JobListing>,
}

impl JobCatalog {
    /// Fetch the job list; a failure leaves the catalog empty.
    pub async fn prefetch(api: &dyn AuthApi) -> Self {
        match api.job_titles().await {
            Ok(jobs) => {
                debug!(count = jobs.len(), "Job catalog loaded");
                Self { jobs }
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch job titles");
                Self::default()
            }
        }
    }

    pub fn jobs(&self) -> &[JobListing] {
        &self.jobs
    }

    /// Distinct job titles containing `partial`, in catalog order
    pub fn suggestions(&self, partial: &str) -> Vec<&str> {
        let partial = partial.trim();
        let mut titles: Vec<&str> = Vec::new();
        for title in self.jobs.iter().filter_map(|j| j.job_title.as_deref()) {
            if contains_ignore_case(title, partial) && !titles.contains(&title) {
                titles.push(title);
            }
        }
        titles
    }
}
