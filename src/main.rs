//! Staledesk server binary.
//!
//! ```text
//! staledesk [--config conf.json] serve [--listen-host H] [--listen-port P] ...
//! staledesk [--config conf.json] config show-raw | show-contacts
//! ```
//!
//! Every flag can also be set through its `STALE_*` environment variable.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use staledesk::config::{load_seed, LogFormat, ServerConfig, UpdateMissingPolicy};
use staledesk::lifecycle::{startup, Shutdown};
use staledesk::observability::logging::init_logging;
use staledesk::store::ContactStore;

#[derive(Parser)]
#[command(name = "staledesk", version)]
#[command(about = "A helpdesk compatible REST API serving in-memory contacts", long_about = None)]
struct Cli {
    /// Seed file (defaults to conf.json in ../config/ or config/)
    #[arg(long, global = true, env = "STALE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "STALE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format (pretty, json)
    #[arg(long, global = true, env = "STALE_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve(ServeArgs),
    /// Commands related to the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the raw seed document as read from disk
    ShowRaw,
    /// Print the seeded contacts as the list endpoint would return them
    ShowContacts,
}

#[derive(Args)]
struct ServeArgs {
    /// Hostname/IP interface to bind (usually localhost or 0.0.0.0)
    #[arg(long, env = "STALE_LISTEN_HOST")]
    listen_host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "STALE_LISTEN_PORT")]
    listen_port: Option<u16>,

    /// Whether clients are expected to send credentials (not enforced)
    #[arg(long, env = "STALE_REQUIRE_AUTH", action = ArgAction::Set)]
    require_auth: Option<bool>,

    /// Request timeout in seconds
    #[arg(long, env = "STALE_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Maximum request body size in bytes
    #[arg(long, env = "STALE_MAX_BODY_SIZE")]
    max_body_size: Option<usize>,

    /// Behaviour of PUT on an unknown contact ID (upsert, not-found)
    #[arg(long, env = "STALE_UPDATE_MISSING")]
    update_missing: Option<UpdateMissingPolicy>,

    /// Random draws before contact ID allocation gives up
    #[arg(long, env = "STALE_MAX_ID_ATTEMPTS")]
    max_id_attempts: Option<u32>,

    /// Expose Prometheus metrics on this address
    #[arg(long, env = "STALE_METRICS_ADDRESS")]
    metrics_address: Option<String>,
}

impl ServeArgs {
    /// Overlay the flags that were given onto `config`.
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.listen_host {
            config.listener.host = host;
        }
        if let Some(port) = self.listen_port {
            config.listener.port = port;
        }
        if let Some(require_auth) = self.require_auth {
            config.listener.require_auth = require_auth;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.timeouts.request_secs = secs;
        }
        if let Some(size) = self.max_body_size {
            config.limits.max_body_size = size;
        }
        if let Some(policy) = self.update_missing {
            config.contacts.update_missing = policy;
        }
        if let Some(attempts) = self.max_id_attempts {
            config.contacts.max_id_attempts = attempts;
        }
        if let Some(address) = self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = address;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ServerConfig::default();
    config.observability.log_level = cli.log_level;
    config.observability.log_format = cli.log_format;
    init_logging(&config.observability);

    let seed = match load_seed(cli.config.as_deref()) {
        Ok(seed) => seed,
        Err(e) => {
            tracing::error!(error = %e, "Unable to read seed data");
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("staledesk v{} starting", env!("CARGO_PKG_VERSION"));
            args.apply(&mut config);

            let shutdown = Shutdown::new();
            if let Err(e) = startup::run(config, seed, shutdown.subscribe()).await {
                tracing::error!(error = %e, "Server exited with an error");
                return Err(e.into());
            }
            tracing::info!("Shutdown complete");
        }
        Commands::Config { command } => match command {
            ConfigCommands::ShowRaw => {
                println!("{}", serde_json::to_string_pretty(&seed.raw)?);
            }
            ConfigCommands::ShowContacts => {
                let store = ContactStore::from_seed(seed.contacts);
                let contacts: Vec<_> = store.values().collect();
                println!("{}", serde_json::to_string_pretty(&contacts)?);
            }
        },
    }

    Ok(())
}
