//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "gatekeep.toml";

/// Environment variable that overrides `auth.jwt_secret`
pub const SECRET_ENV_VAR: &str = "GATEKEEP_JWT_SECRET";

/// Load configuration from gatekeep.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let mut config: Config = toml::from_str(&content)?;
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Replace config values with those set in the environment
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(secret) = env::var(SECRET_ENV_VAR) {
        if !secret.trim().is_empty() {
            config.auth.jwt_secret = Some(secret);
        }
    }
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern; failure here is a bug in the codebase
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content with the given signing secret
pub fn default_config_content(secret: &str) -> String {
    format!(
        r#"# gatekeep configuration

[server]
host = "127.0.0.1"
port = 5000

[database]
# Use ":memory:" for a store that is discarded on exit
path = "./data.db"

[auth]
# Overridden by the {env} environment variable when set
jwt_secret = "{secret}"
# Seconds until an access token expires; 0 disables expiry
token_ttl_secs = 3600
bcrypt_cost = 12
"#,
        env = SECRET_ENV_VAR,
        secret = secret,
    )
}

/// Produce a random signing secret for new config files
pub fn generate_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
