use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Minimum length accepted for the cookie signing secret.
pub const MIN_SECRET_KEY_LENGTH: usize = 64;

/// Configuration options of the blog server, loaded from `config/*.yaml`
/// and `APP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Signs session and flash-message cookies.
    pub secret_key: String,
    pub templates_dir: String,
    pub static_dir: String,
    /// Root directory for uploaded post images.
    pub media_dir: String,
}

impl ServerConfig {
    /// Layer `config/default.yaml`, the optional `config/{app_env}.yaml` and
    /// `APP_*` variables, in that order.
    pub fn load(app_env: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?;

        let server_config: ServerConfig = settings.try_deserialize()?;
        server_config.validate()?;
        Ok(server_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.len() < MIN_SECRET_KEY_LENGTH {
            return Err(ConfigError::Message(format!(
                "secret_key must be at least {MIN_SECRET_KEY_LENGTH} bytes long"
            )));
        }
        Ok(())
    }
}
