use clap::Args;

use common::prelude::RegistryError;
use ecc_daemon::state::{AppConfig, AppState, StateError};
use ecc_daemon::{ServiceConfig, ServiceState};

/// Path and secret of the demo codebook written by `--seed`
const SEED_PATH: &str = "dumdum";
const SEED_SECRET: &str = "password123";

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the codebook pages are served on
    #[arg(long, default_value_t = 8080)]
    pub listen_port: u16,

    /// Default log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Claim a demo path so there is something to look at
    #[arg(long)]
    pub seed: bool,

    /// Remove an existing directory, database included, and start over
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),

    #[error("unable to open the database: {0}")]
    Database(#[from] ecc_daemon::service_state::StateSetupError),

    #[error("unable to seed {path}: {reason}")]
    Seed { path: String, reason: String },
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            listen_port: self.listen_port,
            log_level: self.log_level.clone(),
            log_dir: None,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config), self.force)?;

        let mut output = format!(
            "Initialized ecc directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - Listen port: {}\n\
             - Log level: {}",
            state.ecc_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.listen_port,
            state.config.log_level,
        );

        if self.seed {
            seed(&state).await?;
            output.push_str(&format!("\n- Seeded /{} (secret: {})", SEED_PATH, SEED_SECRET));
        }

        Ok(output)
    }
}

async fn seed(state: &AppState) -> Result<(), InitError> {
    let mut config = ServiceConfig::ephemeral(([127, 0, 0, 1], state.config.listen_port).into());
    config.sqlite_path = Some(state.db_path.clone());
    let service = ServiceState::from_config(&config).await?;

    match service.registry().submit_secret(SEED_PATH, SEED_SECRET).await {
        Ok(_) => Ok(()),
        Err(RegistryError::InvalidSecret) => Err(InitError::Seed {
            path: SEED_PATH.to_string(),
            reason: "already claimed with a different secret".to_string(),
        }),
        Err(e) => Err(InitError::Seed {
            path: SEED_PATH.to_string(),
            reason: e.to_string(),
        }),
    }
}
