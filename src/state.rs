use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use deadpool_postgres::Pool;

use crate::config;
use crate::db;
use crate::error;

#[derive(Debug)]
pub struct Shared {
    storage: PathBuf,
    server_path: String,
    tmp: PathBuf,
    session_duration: Duration,
    pool: Pool,
}

pub type ArcShared = Arc<Shared>;

impl Shared {
    pub fn from_config(config: &config::Config) -> error::Result<Shared> {
        tracing::debug!("creating Shared state");

        Ok(Shared {
            storage: config.settings.storage.clone(),
            server_path: config.settings.server_path.clone(),
            tmp: config.settings.tmp.clone(),
            session_duration: Duration::from_secs(config.settings.sec.session.duration),
            pool: db::from_config(config)?,
        })
    }

    pub fn storage(&self) -> &Path {
        &self.storage
    }

    pub fn server_path(&self) -> &str {
        &self.server_path
    }

    pub fn tmp(&self) -> &Path {
        &self.tmp
    }

    pub fn session_duration(&self) -> Duration {
        self.session_duration
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}
