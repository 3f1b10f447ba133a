use axum::extract::FromRef;

use common::prelude::Registry;

use crate::database::{Database, DatabaseSetupError};
use crate::ServiceConfig;

/// Shared handles for every request: the database and the registry over it
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    registry: Registry<Database>,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let database = match &config.sqlite_path {
            Some(path) => Database::connect(path).await?,
            None => Database::in_memory().await?,
        };
        Ok(Self::new(database))
    }

    pub(crate) fn new(database: Database) -> Self {
        let registry = Registry::new(database.clone());
        Self { database, registry }
    }

    pub fn registry(&self) -> &Registry<Database> {
        &self.registry
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database().clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to setup the database: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
}
