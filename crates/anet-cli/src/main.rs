mod cmd;
mod output;

use anet_client::{ApiClient, Session};
use anet_core::types::LogSeverity;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use cmd::email::EmailSubcommand;
use cmd::org::OrgSubcommand;
use cmd::search::SearchSubcommand;
use cmd::settings::SettingsSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "anet",
    about = "ANET client: validate addresses, build search links, and edit organizations",
    version,
    propagate_version = true
)]
struct Cli {
    /// Base URL of the ANET server
    #[arg(long, global = true, env = "ANET_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Client dictionary (YAML); the built-in one is used when omitted
    #[arg(long, global = true, env = "ANET_SETTINGS")]
    settings: Option<PathBuf>,

    /// User name for Basic auth
    #[arg(long, global = true, env = "ANET_USER")]
    user: Option<String>,

    /// Password for Basic auth
    #[arg(long, global = true, env = "ANET_PASS", hide_env_values = true)]
    pass: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate email addresses against the allowed domains
    Email {
        #[command(subcommand)]
        subcommand: EmailSubcommand,
    },

    /// Inspect and validate the client dictionary
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },

    /// Encode and decode advanced-search query strings
    Search {
        #[command(subcommand)]
        subcommand: SearchSubcommand,
    },

    /// Show, create, and update organizations
    Org {
        #[command(subcommand)]
        subcommand: OrgSubcommand,
    },

    /// List the current user's subscriptions
    Subscriptions {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    /// Send a log line to the server's client log
    Log {
        /// Severity of the log line
        #[arg(long, default_value = "INFO", ignore_case = true, value_parser = severity_parser())]
        severity: String,

        /// Page the message relates to
        #[arg(long = "page-url", default_value = "")]
        page_url: String,

        /// Line number within the page, if any
        #[arg(long)]
        line: Option<u32>,

        message: String,
    },
}

fn severity_parser() -> PossibleValuesParser {
    PossibleValuesParser::new(LogSeverity::all().iter().map(|s| s.as_str()))
}

/// Where the server lives and who is talking to it.
pub struct Remote {
    pub url: String,
    pub session: Session,
}

impl Remote {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.url, self.session.clone())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings.as_deref();
    let remote = Remote {
        url: cli.url.clone(),
        session: match (&cli.user, &cli.pass) {
            (Some(user), Some(pass)) => Session::with_credentials(user, pass),
            _ => Session::anonymous(),
        },
    };

    let result = match cli.command {
        Commands::Email { subcommand } => cmd::email::run(settings, subcommand, cli.json),
        Commands::Settings { subcommand } => cmd::settings::run(settings, subcommand, cli.json),
        Commands::Search { subcommand } => {
            cmd::search::run(settings, &remote, subcommand, cli.json)
        }
        Commands::Org { subcommand } => cmd::org::run(settings, &remote, subcommand, cli.json),
        Commands::Subscriptions { page } => cmd::subscriptions::run(&remote, page, cli.json),
        Commands::Log {
            severity,
            page_url,
            line,
            message,
        } => cmd::log::run(&remote, &severity, &page_url, line, &message),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
