use tokio_postgres::{Config as PgConfig, NoTls};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};

use crate::config;
use crate::error;

pub fn from_config(config: &config::Config) -> error::Result<Pool> {
    let db = &config.settings.db;
    let mut pg_config = PgConfig::new();
    pg_config.user(db.user.as_str());
    pg_config.host(db.host.as_str());
    pg_config.port(db.port);
    pg_config.dbname(db.dbname.as_str());

    if let Some(password) = &db.password {
        pg_config.password(password.as_str());
    }

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };

    let manager = Manager::from_config(pg_config, NoTls, manager_config);

    Ok(Pool::builder(manager)
        .max_size(4)
        .build()?)
}
