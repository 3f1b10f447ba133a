use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address the codebook pages are served on
    pub listen_addr: SocketAddr,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// An in-memory service listening on `listen_addr`
    pub fn ephemeral(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            sqlite_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
