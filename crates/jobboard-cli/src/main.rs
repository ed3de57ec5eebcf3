//! Job board CLI - log in, register and keep a job board session alive
//! from the terminal.

mod app;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Parser)]
#[command(name = "jobboard", version, about = "Job board session client")]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true, env = "JOBBOARD_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a job seeker account
    RegisterSeeker,
    /// Create a company account
    RegisterCompany,
    /// Log in with a Google identity token
    Google {
        #[arg(long)]
        token: String,
    },
    /// Show the current session
    Status,
    /// Exchange the session token for a fresh one
    Revalidate,
    /// End the session
    Logout,
    /// Search jobs by title
    Search { query: String },
    /// List job titles
    Jobs {
        /// Only show titles containing this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Keep the session fresh until interrupted
    Watch,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_file: Option<&PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("jobboard.log"));
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_ref());
    info!("Job board CLI starting");

    let mut app = App::new()?;

    match cli.command {
        Command::Login { email } => app.login(email).await,
        Command::RegisterSeeker => app.register_seeker().await,
        Command::RegisterCompany => app.register_company().await,
        Command::Google { token } => app.google(&token).await,
        Command::Status => app.status(),
        Command::Revalidate => app.revalidate().await,
        Command::Logout => app.logout(),
        Command::Search { query } => app.search(&query).await,
        Command::Jobs { filter } => app.jobs(filter.as_deref()).await,
        Command::Watch => app.watch().await,
    }
}
