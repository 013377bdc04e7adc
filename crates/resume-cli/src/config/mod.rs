//! Command-line and environment configuration.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig      # Bind address, drain window
//! ├── cors: CorsConfig          # Allowed origins
//! ├── recovery: RecoveryConfig  # Request timeout
//! └── service: ServiceConfig    # Token keys, access rules, admin seed
//! ```
//!
//! Every option can also be set through its environment variable; run with
//! `--help` for the full list.

mod server;

use anyhow::Context;
use clap::Parser;
use resume_server::middleware::{CorsConfig, RecoveryConfig};
use resume_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "resume")]
#[command(about = "Résumé builder API server")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub server: ServerConfig,

    #[clap(flatten)]
    pub cors: CorsConfig,

    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Authentication and access control configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads `.env` (when enabled) and parses arguments.
    ///
    /// Values from `.env` act as environment defaults, so explicit
    /// arguments still win.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Installs the `RUST_LOG`-filtered fmt subscriber, `info` by default.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Checks settings clap cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.service
            .bootstrap_admin()
            .context("invalid administrator configuration")?;
        Ok(())
    }

    /// Logs configuration without secrets.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = std::process::id(),
            dotenv = cfg!(feature = "dotenv"),
            "build information"
        );

        let rules = &self.service.access_rules;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %self.server.socket_addr(),
            drain_secs = self.server.shutdown_timeout,
            request_timeout_secs = self.recovery.request_timeout,
            cors_origins = ?self.cors.allowed_origins,
            token_ttl_secs = self.service.session_keys.auth_token_ttl,
            public_paths = ?rules.public_paths,
            admin_path_prefix = %rules.admin_path_prefix,
            user_path_prefix = %rules.user_path_prefix,
            admin_seeded = self.service.admin_username.is_some(),
            "configuration loaded"
        );
    }
}
