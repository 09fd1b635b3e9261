use std::env;
use std::path::Path;

use auth::password::hasher::DEFAULT_ITERATIONS;
use auth::password::hasher::MIN_ITERATIONS;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;

/// Shortest signing secret accepted for HS256.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Absent when running against the in-memory store
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

// Keeps the signing secret out of logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    auth::jwt::DEFAULT_TOKEN_TTL_HOURS
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_from(Path::new("config"), &run_mode, None)
    }

    /// Load configuration from `config_dir` for `run_mode`.
    ///
    /// `environment` replaces the process environment as the override source
    /// when given.
    pub fn load_from(
        config_dir: &Path,
        run_mode: &str,
        environment: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let default_file = config_dir.join("default");
        let run_mode_file = config_dir.join(run_mode);

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&run_mode_file.to_string_lossy()).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(environment),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service must not start with.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Secret too short, non-positive token lifetime,
    ///   or iteration count below the minimum
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }

        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }

        if self.password.iterations < MIN_ITERATIONS {
            return Err(ConfigError::Message(format!(
                "password.iterations must be at least {}",
                MIN_ITERATIONS
            )));
        }

        Ok(())
    }
}
