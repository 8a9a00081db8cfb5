mod admin;
mod commands;

pub use admin::{run_bless, run_init, run_list, run_password, run_transfer};
pub use commands::AdminCommands;

use std::path::PathBuf;

use crate::config::ServerConfig;
use crate::store::SqliteStore;

/// Loads the config file if one was given, then applies the data directory
/// override.
pub fn load_config(config: Option<&str>, data_dir: Option<String>) -> anyhow::Result<ServerConfig> {
    let mut config = match config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(data_dir) = data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    Ok(config)
}

/// Opens the store for an existing installation.
pub fn init_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'mel admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}
