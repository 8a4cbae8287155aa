//! CLI command implementations

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Args, Subcommand};
use seedfront_core::{FrontConfig, SeedfrontError};
use seedfront_core::config::{SyncConfig, database_path, locate_config_file};
use seedfront_core::tracing_setup::{CliLogLevel, init_tracing};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(ServeArgs),
    /// Show which configuration file and database would be used
    Config {
        /// SeedboxSync YAML file, checked before the default locations
        #[arg(long)]
        config: Option<PathBuf>,
        /// Database file, overriding `local.db_file`
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

/// Options of `seedfront serve`. Flags override `SEEDFRONT_*` variables.
#[derive(Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long)]
    host: Option<String>,
    /// Port to bind to
    #[arg(short, long)]
    port: Option<u16>,
    /// SeedboxSync YAML file, checked before the default locations
    #[arg(long)]
    config: Option<PathBuf>,
    /// Database file, overriding `local.db_file`
    #[arg(long)]
    database: Option<PathBuf>,
    /// Disable the response cache
    #[arg(long)]
    no_cache: bool,
    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,
    /// Also write a full trace of this run to `<DIR>/seedfront-last-run.log`
    #[arg(long, value_name = "DIR")]
    logs_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Environment configuration with the flags applied on top.
    fn into_config(self, mut config: FrontConfig) -> FrontConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.config.is_some() {
            config.paths.config_file = self.config;
        }
        if self.database.is_some() {
            config.paths.database = self.database;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        config
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns the failure of the command that ran
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => serve(args).await,
        Commands::Config { config, database } => {
            show_config(config, database);
            Ok(())
        }
    }
}

/// Start the dashboard server
///
/// # Errors
/// - Tracing could not be initialized
/// - The server could not bind or stopped with an error
pub async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    init_tracing(args.log_level.as_tracing_level(), args.logs_dir.as_deref())
        .map_err(|e| anyhow!("Failed to initialize tracing: {e}"))?;

    let config = args.into_config(FrontConfig::from_env());
    tracing::info!("Starting SeedFront {}", env!("CARGO_PKG_VERSION"));

    seedfront_web::run_server(config)
        .await
        .map_err(|e| anyhow!("Server failed: {e}"))
}

/// Print the resolved configuration and database paths
///
/// A configuration file that fails to load is reported, not returned.
pub fn show_config(config: Option<PathBuf>, database: Option<PathBuf>) {
    let mut front = FrontConfig::from_env();
    if config.is_some() {
        front.paths.config_file = config;
    }
    if database.is_some() {
        front.paths.database = database;
    }

    let explicit = front.paths.config_file.as_deref();
    let config_file = locate_config_file(explicit);
    let sync = config_file.as_ref().and_then(|path| match SyncConfig::load(path) {
        Ok(sync) => Some(sync),
        Err(err) => {
            println!("Warning: {}", SeedfrontError::from(err).user_message());
            None
        }
    });
    let db = database_path(front.paths.database.as_deref(), sync.as_ref());

    match &config_file {
        Some(path) => println!("Configuration file: {} (found)", path.display()),
        None => println!("Configuration file: not found"),
    }
    let status = if db.is_file() { "found" } else { "missing" };
    println!("Database: {} ({status})", db.display());
    println!("Listen address: http://{}", front.bind_address());
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_serve_flags_override_environment() {
        let cli = TestCli::parse_from([
            "seedfront", "serve", "--port", "9000", "--no-cache", "--log-level", "debug",
        ]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.log_level, CliLogLevel::Debug);

        let mut env = FrontConfig::default();
        env.server.host = "0.0.0.0".to_string();
        let config = args.into_config(env);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_config_command_parses() {
        let cli = TestCli::parse_from(["seedfront", "config", "--database", "/tmp/x.db"]);
        assert!(matches!(
            cli.command,
            Commands::Config { database: Some(_), .. }
        ));
    }
}
