use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use jobboard_core::api::ApiClient;
use jobboard_core::auth::{FileCookieJar, SessionKind, SessionStore};
use jobboard_core::controller::{
    AuthError, CompanyForm, FormStatus, LoginForm, Revalidation, RevalidationTimer,
    SeekerRegistration, SessionController,
};
use jobboard_core::navbar::{JobCatalog, NavEntry, Navbar, SearchBox};
use jobboard_core::routes::{History, Navigator, Route};
use jobboard_core::utils::{format_minutes, truncate_string};
use jobboard_core::Config;

/// Column width for job titles in listings
const TITLE_WIDTH: usize = 60;

pub struct App {
    config: Config,
    store: Arc<SessionStore>,
    history: Arc<History>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir()?;
        let store = Arc::new(SessionStore::load(Box::new(FileCookieJar::new(cache_dir))));
        debug!(authenticated = store.is_authenticated(), "Session loaded");

        Ok(Self::with_store(config, store))
    }

    fn with_store(config: Config, store: Arc<SessionStore>) -> Self {
        Self {
            config,
            store,
            history: Arc::new(History::default()),
        }
    }

    /// Client for the backend. Commands that stay local never build one,
    /// so they work without an API URL.
    fn api(&self) -> Result<Arc<ApiClient>> {
        let base_url = self.config.api_base_url()?;
        let api = ApiClient::new(&base_url)?;
        debug!(base_url = %api.base_url(), "API client configured");
        Ok(Arc::new(api))
    }

    fn controller(&self, api: Arc<ApiClient>) -> Arc<SessionController> {
        Arc::new(SessionController::new(
            api,
            self.store.clone(),
            self.history.clone(),
        ))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        println!("\n=== Job Board Login ===\n");

        let email = match email {
            Some(email) => email,
            None => match self.config.last_email.clone() {
                Some(last) => {
                    let input = prompt(&format!("Email [{}]: ", last))?;
                    if input.is_empty() {
                        last
                    } else {
                        input
                    }
                }
                None => prompt("Email: ")?,
            },
        };
        let password = prompt_password("Password: ")?;

        let controller = self.controller(self.api()?);
        let mut form = LoginForm::new(email.clone(), password);
        let result = controller.login(&mut form).await;
        form.password.clear();
        self.report(result, &form.status)?;

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        self.print_welcome();
        Ok(())
    }

    pub async fn register_seeker(&self) -> Result<()> {
        let controller = self.controller(self.api()?);
        println!("\n=== Register as job seeker ===\n");

        let first_name = prompt("First name: ")?;
        let last_name = prompt("Last name: ")?;
        let email = prompt("Email: ")?;
        let password = prompt_new_password()?;

        let mut form = SeekerRegistration::new(first_name, last_name, email, password);
        let result = controller.register_seeker(&mut form).await;
        form.password.clear();
        self.report(result, &form.status)?;

        println!("Registered successfully.");
        self.print_welcome();
        Ok(())
    }

    pub async fn register_company(&self) -> Result<()> {
        let controller = self.controller(self.api()?);
        println!("\n=== Register as company ===\n");

        let email = prompt("Email: ")?;
        let password = prompt_new_password()?;

        let mut form = CompanyForm::new(email, password);
        let result = controller.register_company(&mut form).await;
        form.password.clear();
        self.report(result, &form.status)?;

        println!("Registered successfully.");
        self.print_welcome();
        Ok(())
    }

    pub async fn google(&self, provider_token: &str) -> Result<()> {
        let controller = self.controller(self.api()?);
        let mut status = FormStatus::default();
        let result = controller.federated_login(&mut status, provider_token).await;
        self.report(result, &status)?;

        self.print_welcome();
        Ok(())
    }

    /// Turn a form outcome into a CLI result, printing field errors.
    fn report(&self, result: Result<Route, AuthError>, status: &FormStatus) -> Result<()> {
        match result {
            Ok(route) => {
                info!(route = %route, "Form submitted");
                Ok(())
            }
            Err(AuthError::Validation(errors)) => {
                for (field, message) in errors.iter() {
                    eprintln!("  {}: {}", field, message);
                }
                Err(anyhow!("Please fix the fields above"))
            }
            Err(e) => Err(anyhow!(status.back_error.clone().unwrap_or_else(|| e.user_message()))),
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn status(&self) -> Result<()> {
        let Some(session) = self.store.snapshot() else {
            println!("Not logged in.");
            return Ok(());
        };

        let identity = session.identity();
        println!("Logged in as {} ({})", identity.display_name(), identity.role);
        if let Some(ref email) = identity.email {
            println!("Email:   {}", email);
        }
        if identity.is_expired() {
            println!("Expires: expired, run `jobboard revalidate`");
        } else {
            match identity.minutes_until_expiry() {
                Some(minutes) => println!("Expires: in {}", format_minutes(minutes)),
                None => println!("Expires: unknown"),
            }
        }

        let entries: Vec<String> = Navbar::for_session(session.kind())
            .iter()
            .filter_map(|entry| match entry {
                NavEntry::Link { label, .. } => Some(label.to_string()),
                NavEntry::SearchBox => Some("Search".to_string()),
                NavEntry::Logout => Some("Logout".to_string()),
                NavEntry::ProfilePicture { .. } => None,
            })
            .collect();
        println!("Menu:    {}", entries.join(" | "));
        Ok(())
    }

    pub async fn revalidate(&self) -> Result<()> {
        let controller = self.controller(self.api()?);
        match controller.revalidate_token().await {
            Revalidation::Refreshed => println!("Session refreshed."),
            Revalidation::LoggedOut => println!("Session expired. Please log in again."),
            Revalidation::Stale => println!("Session changed during revalidation."),
            Revalidation::Unreachable => {
                return Err(anyhow!("Could not reach the server; session kept."));
            }
            Revalidation::NoSession => println!("Not logged in."),
        }
        Ok(())
    }

    /// Local only: clears the session and expires the cookie.
    pub fn logout(&self) -> Result<()> {
        if self.store.clear() {
            info!("Logged out");
        } else {
            debug!("Logout without an active session");
        }
        self.history.replace(Route::Landing);
        println!("Logged out.");
        Ok(())
    }

    // =========================================================================
    // Jobs
    // =========================================================================

    pub async fn search(&self, query: &str) -> Result<()> {
        if self.store.kind() != SessionKind::Seeker {
            return Err(anyhow!("Job search is available to logged-in job seekers."));
        }

        let api = self.api()?;
        let Some(route) = SearchBox::new(query).submit(self.history.as_ref()) else {
            return Err(anyhow!("Search query is empty"));
        };
        let landed = self.controller(api.clone()).on_navigate(route.clone()).await;
        if landed != route {
            println!("Session expired. Please log in again.");
            return Ok(());
        }

        println!("{}", route.path());
        let catalog = JobCatalog::prefetch(api.as_ref()).await;
        let matches = catalog.suggestions(query);
        if matches.is_empty() {
            println!("No matching jobs.");
        }
        for title in matches {
            println!("  {}", truncate_string(title, TITLE_WIDTH));
        }
        Ok(())
    }

    pub async fn jobs(&self, filter: Option<&str>) -> Result<()> {
        let catalog = JobCatalog::prefetch(self.api()?.as_ref()).await;
        let titles = catalog.suggestions(filter.unwrap_or(""));
        println!(
            "{} listings, {} distinct titles",
            catalog.jobs().len(),
            titles.len()
        );
        for title in titles {
            println!("  {}", truncate_string(title, TITLE_WIDTH));
        }
        Ok(())
    }

    /// Guard the current route, then revalidate on a timer until Ctrl-C.
    pub async fn watch(&self) -> Result<()> {
        let controller = self.controller(self.api()?);
        let route = controller.on_navigate(self.history.current()).await;
        if !self.store.is_authenticated() {
            return Err(anyhow!("Not logged in."));
        }

        let period = self.config.revalidate_interval();
        let timer = RevalidationTimer::spawn(controller, period);
        println!(
            "Watching session on {} (every {}s). Press Ctrl-C to stop.",
            route,
            period.as_secs()
        );

        tokio::signal::ctrl_c().await?;
        timer.stop();
        info!("Watch stopped");
        Ok(())
    }

    fn print_welcome(&self) {
        if let Some(identity) = self.store.identity() {
            println!("Welcome, {}!", identity.display_name());
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_password(label: &str) -> Result<String> {
    let password = rpassword::prompt_password(label)?;
    Ok(password)
}

fn prompt_new_password() -> Result<String> {
    let password = prompt_password("Password: ")?;
    let confirm = prompt_password("Confirm password: ")?;
    if password != confirm {
        return Err(anyhow!("Passwords do not match"));
    }
    Ok(password)
}
