//! Interactive console client for the Cloud Storage XML API.
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `GCS_ACCESS_TOKEN` | OAuth2 access token; when unset the stored credentials file is read |
//! | `GCS_PROJECT_ID` | Project id, overriding the stored one |
//! | `GCS_XML_PROJECT_FILE` | Project id file (default `~/.gcs-xml/project.dat`) |
//! | `GCS_XML_ENDPOINT` | Service host (default `storage.googleapis.com`) |
//! | `RUST_LOG` | Fine-grained tracing filter (overrides `--log-level`) |

mod menu;
mod prompt;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcs_xml::{
    AuthProvider, Commands, HttpTransport, ProjectId, ProjectStore, SessionConfig,
    StaticTokenProvider, StoredTokenProvider,
    auth::ACCESS_TOKEN_ENV,
    config::{ENDPOINT_ENV, PROJECT_FILE_ENV},
};
use tracing_subscriber::EnvFilter;

use crate::prompt::Prompt;

#[derive(Parser, Debug)]
#[command(name = "gcs-xml")]
#[command(about = "Interact with Google Cloud Storage through the XML API")]
struct Args {
    /// Level of logging detail.
    #[arg(long, value_enum, ignore_case = true, default_value = "INFO")]
    log_level: LogLevel,

    /// Storage service host, without scheme.
    #[arg(long, env = ENDPOINT_ENV)]
    endpoint: Option<String>,

    /// File holding the project id.
    #[arg(long, env = PROJECT_FILE_ENV)]
    project_file: Option<PathBuf>,

    /// JSON file with an `access_token` field.
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "UPPER")]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

fn init_tracing(level: LogLevel) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(level.filter())
            .with_context(|| format!("invalid log level filter: {level:?}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

fn project_id<R: io::BufRead, W: io::Write>(
    store: &ProjectStore,
    prompt: &mut Prompt<R, W>,
) -> Result<ProjectId> {
    if let Some(id) = store.resolve()? {
        return Ok(id);
    }

    let id = ProjectId::new(prompt.ask("Enter your project id (found in the API console): ")?)?;
    store
        .save(&id)
        .with_context(|| format!("failed to store project id in {}", store.path().display()))?;
    Ok(id)
}

fn auth_provider(args: &Args) -> Result<Arc<dyn AuthProvider>> {
    if std::env::var_os(ACCESS_TOKEN_ENV).is_some() {
        return Ok(Arc::new(StaticTokenProvider::from_env()?));
    }
    let provider = match &args.token_file {
        Some(path) => StoredTokenProvider::new(path),
        None => StoredTokenProvider::default_location()?,
    };
    tracing::debug!(path = %provider.path().display(), "using stored credentials");
    Ok(Arc::new(provider))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level)?;

    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());

    let store = match &args.project_file {
        Some(path) => ProjectStore::new(path),
        None => ProjectStore::from_env()?,
    };
    let mut config = SessionConfig::new(project_id(&store, &mut prompt)?);
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint)?;
    }

    let transport = Arc::new(HttpTransport::new(
        None,
        args.timeout_secs.map(Duration::from_secs),
    )?);
    let auth = auth_provider(&args)?;
    let mut commands =
        Commands::connect(config, transport, auth).context("failed to authorize session")?;

    tracing::info!(
        project = %commands.session().project_id(),
        endpoint = commands.session().endpoint(),
        "session ready"
    );

    menu::run(&mut commands, &mut prompt)
}
