//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::UserInfo;
use crate::cli::{error, info, print_user_table, success, warn, OutputFormat};
use crate::config::{self, loader, Config};
use crate::db::Database;
use crate::error::Error;

/// Write a new gatekeep.toml configuration file
pub async fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(loader::CONFIG_FILENAME));

    if config_path.exists() && !force {
        warn(&format!("{} already exists", config_path.display()));
        return Ok(());
    }

    let content = loader::default_config_content(&loader::generate_secret());
    fs::write(&config_path, content)?;

    success(&format!("Created {}", config_path.display()));
    info("Run 'gatekeep serve' to start the API");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(Error::ConfigNotFound) if config_path.is_none() => {
            warn("No gatekeep.toml found, using defaults");
            let mut config = Config::default();
            loader::apply_env_overrides(&mut config);
            config
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info(&format!("Starting server at http://{}", config.bind_addr()));

    if let Err(e) = crate::api::run_server(config).await {
        error(&format!("Server stopped: {}", e));
        return Err(e.into());
    }
    Ok(())
}

/// List registered users
pub async fn users(config_path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let db = Database::open(&config.database)?;

    let users: Vec<UserInfo> = db.list_users()?.into_iter().map(UserInfo::from).collect();

    match format {
        OutputFormat::Table => {
            print_user_table(&users);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&users)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&users)?;
            println!("{}", yaml);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> crate::error::Result<Config> {
    match path {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    }
}
