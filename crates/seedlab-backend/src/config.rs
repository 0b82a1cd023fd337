use std::path::PathBuf;

use directories::ProjectDirs;
use seedlab_bridge::config::Config;
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};

/// Errors that can occur while loading or resolving application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid TOML or does not match the expected structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// Failed to serialize the configuration to TOML (e.g., when saving changes).
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

fn config_path() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("uy", "seedlab", "seedlab") {
        Some(dirs) => Ok(dirs.config_dir().join("config.toml")),
        None => Err(ConfigError::DirectoriesNotFound),
    }
}

/// Loads the application configuration from disk, writing the defaults on
/// first run.
pub async fn load_config() -> Result<Config, ConfigError> {
    let config_path = config_path()?;
    log::info!("Loading configuration from {config_path:?}");
    load_config_from(config_path).await
}

pub(crate) async fn load_config_from(config_path: PathBuf) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let contents = read_to_string(config_path).await?;
        let config: Config = toml::from_str(&contents)?;
        return Ok(config);
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(&config)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(config)
}

/// Saves the current configuration to disk, overwriting any existing file.
pub async fn save_config(config: &Config) -> Result<(), ConfigError> {
    let config_path = config_path()?;
    if let Some(parent) = config_path.parent() {
        create_dir_all(parent).await?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(config_path)
        .await?;

    let contents = toml::to_string_pretty(&config)?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config_from(path.clone()).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.notifications.poll_interval_secs, 30);

        let reloaded = load_config_from(path).await.unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
    }

    #[tokio::test]
    async fn partial_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[session]\ntoken = \"abc\"\nuser_id = 4\n")
            .await
            .unwrap();

        let config = load_config_from(path).await.unwrap();
        assert_eq!(config.session.token.as_deref(), Some("abc"));
        assert_eq!(config.session.user_id, Some(4));
        assert_eq!(config.listing.page_size, 10);
        assert!(config.notifications.polling_enabled);
    }
}
