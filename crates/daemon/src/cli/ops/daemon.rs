use std::net::SocketAddr;

use clap::Args;

use ecc_daemon::process::ServiceError;
use ecc_daemon::state::{AppState, StateError};
use ecc_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the listen port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for log files (default from config, stdout only if unset)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Keep claims in memory instead of the configured database
    #[arg(long)]
    pub memory: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("daemon failed: {0}")]
    Failed(#[from] ServiceError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let port = self.port.unwrap_or(state.config.listen_port);
        let config = ServiceConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            sqlite_path: (!self.memory).then_some(state.db_path.clone()),
            log_level: state.config.log_level()?,
            log_dir: self.log_dir.clone().or(state.config.log_dir.clone()),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
