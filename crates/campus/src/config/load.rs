//! Layered configuration loading.

use std::path::{Path, PathBuf};

use super::{Config, ConfigError, Overrides};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CAMPUS_CONFIG";

/// Config file picked up from the working directory when nothing else is named
pub const DEFAULT_CONFIG_FILE: &str = "campus.toml";

/// Load configuration from every layer and validate the result.
///
/// # Errors
///
/// Returns error if:
/// - A named config file cannot be read or is malformed TOML
/// - An environment override cannot be parsed
/// - The merged values fail validation
pub fn load_config(overrides: &Overrides) -> Result<Config, ConfigError> {
    let config = match config_file_path(overrides.config_path.as_deref()) {
        Some(path) => load_toml_file(&path)?,
        None => Config::default(),
    };

    let config = config.apply_env_vars()?.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        })
}

/// Read a TOML config file. Missing keys take their defaults.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Parse` if it is not valid TOML for [`Config`].
pub fn load_toml_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Apply `CAMPUS_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a value that does not parse.
    pub fn apply_env_vars(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var("CAMPUS_HTTP_HOST") {
            self.http.host = value;
        }

        if let Ok(value) = std::env::var("CAMPUS_HTTP_PORT") {
            self.http.port = value.parse().map_err(|e| {
                ConfigError::invalid(format!("Invalid CAMPUS_HTTP_PORT value '{value}': {e}"))
            })?;
        }

        if let Ok(value) = std::env::var("CAMPUS_DATABASE_URL") {
            self.database.url = value;
        }

        if let Ok(value) = std::env::var("CAMPUS_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = value.parse().map_err(|e| {
                ConfigError::invalid(format!(
                    "Invalid CAMPUS_DATABASE_MAX_CONNECTIONS value '{value}': {e}"
                ))
            })?;
        }

        if let Ok(value) = std::env::var("CAMPUS_LOG") {
            self.log.filter = value;
        }

        Ok(self)
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.http.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    const VARS: [&str; 6] = [
        CONFIG_ENV,
        "CAMPUS_HTTP_HOST",
        "CAMPUS_HTTP_PORT",
        "CAMPUS_DATABASE_URL",
        "CAMPUS_DATABASE_MAX_CONNECTIONS",
        "CAMPUS_LOG",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_without_sources_is_default() {
        clear_env();

        let config = load_config(&Overrides::default()).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_layers_apply_in_order() {
        clear_env();
        let file = write_config(
            r#"
            [http]
            host = "127.0.0.1"
            port = 3000

            [log]
            filter = "debug"
            "#,
        );
        std::env::set_var("CAMPUS_HTTP_PORT", "4000");
        std::env::set_var("CAMPUS_DATABASE_URL", "sqlite:env.db");

        let config = load_config(&Overrides {
            config_path: Some(file.path().to_path_buf()),
            port: Some(5000),
        })
        .unwrap();
        clear_env();

        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.database.url, "sqlite:env.db");
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    #[serial]
    fn test_config_path_from_environment() {
        clear_env();
        let file = write_config("[database]\nmax_connections = 2\n");
        std::env::set_var(CONFIG_ENV, file.path());

        let config = load_config(&Overrides::default()).unwrap();
        clear_env();

        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    #[serial]
    fn test_non_numeric_port_is_invalid() {
        clear_env();
        std::env::set_var("CAMPUS_HTTP_PORT", "eighty");

        let err = load_config(&Overrides::default()).unwrap_err();
        clear_env();

        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("CAMPUS_HTTP_PORT"));
    }

    #[test]
    #[serial]
    fn test_env_values_are_validated() {
        clear_env();
        std::env::set_var("CAMPUS_DATABASE_MAX_CONNECTIONS", "0");

        let err = load_config(&Overrides::default()).unwrap_err();
        clear_env();

        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_io_error() {
        clear_env();

        let err = load_config(&Overrides {
            config_path: Some(PathBuf::from("/nonexistent/campus.toml")),
            port: None,
        })
        .unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let file = write_config("[http\nport = ");

        let err = load_toml_file(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
