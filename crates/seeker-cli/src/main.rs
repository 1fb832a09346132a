use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod logging;
mod render;
mod sink;

use context::AppContext;

#[derive(Parser)]
#[command(name = "seeker")]
#[command(about = "Seeker CLI - streams competitor analyses for a product idea", long_about = None)]
struct Cli {
    /// Keep config, results and history under this directory
    #[arg(long, global = true, env = "SEEKER_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analysis, or reopen a cached one with --id
    Search {
        query: String,
        /// Open this search id; a cached result is shown without a request
        #[arg(long)]
        id: Option<String>,
        /// Print the final result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a cached result
    Show {
        id: String,
        /// Write figures as PNG files into this directory
        #[arg(long)]
        figures: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Local search history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Sign in and keep the bearer token
    Login {
        /// Falls back to remembered credentials when omitted
        email: Option<String>,
        #[arg(long, env = "SEEKER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Remember these credentials for later logins
        #[arg(long)]
        remember: bool,
    },
    /// Create an account (activation required)
    Register {
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "SEEKER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Activate an account with the token from the activation mail
    Activate { token: String },
    /// Print the URL that starts Google sign-in
    GoogleLogin,
    /// Sign out and forget the stored token
    Logout {
        /// Also forget remembered credentials
        #[arg(long)]
        forget: bool,
    },
    /// Show the remaining credit balance
    Credits,
    /// Client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List recent searches, newest first
    List {
        /// Read the server-side history instead
        #[arg(long)]
        remote: bool,
    },
    /// Remove one search
    Remove {
        id: String,
        /// Also delete its cached result
        #[arg(long)]
        purge: bool,
        /// Also delete it on the server
        #[arg(long)]
        remote: bool,
    },
    /// Remove every search
    Clear {
        #[arg(long)]
        purge: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Update and save the configuration file
    Set {
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        stream_path: Option<String>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::open(cli.home.as_deref())?;
    let _log_guard = logging::init(ctx.logs_dir().as_deref());

    match cli.command {
        Commands::Search { query, id, json } => {
            commands::search::run(&ctx, query, id, json).await?
        }
        Commands::Show { id, figures, json } => {
            commands::show::run(&ctx, &id, figures.as_deref(), json)?
        }
        Commands::History { action } => match action {
            HistoryAction::List { remote } => commands::history::list(&ctx, remote).await?,
            HistoryAction::Remove { id, purge, remote } => {
                commands::history::remove(&ctx, &id, purge, remote).await?
            }
            HistoryAction::Clear { purge } => commands::history::clear(&ctx, purge)?,
        },
        Commands::Login {
            email,
            password,
            remember,
        } => commands::auth::login(&ctx, email, password, remember).await?,
        Commands::Register {
            email,
            name,
            password,
        } => commands::auth::register(&ctx, &email, &password, &name).await?,
        Commands::Activate { token } => commands::auth::activate(&ctx, &token).await?,
        Commands::GoogleLogin => commands::auth::google_login(&ctx)?,
        Commands::Logout { forget } => commands::auth::logout(&ctx, forget).await?,
        Commands::Credits => commands::auth::credits(&ctx).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx)?,
            ConfigAction::Set {
                api_url,
                stream_path,
                timeout_secs,
            } => commands::config::set(&ctx, api_url, stream_path, timeout_secs)?,
        },
    }

    Ok(())
}
