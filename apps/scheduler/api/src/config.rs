use axum_helpers::{CorsConfig, JwtConfig};
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional, server::ServerConfig};

// Import database configs from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Account promoted or created as superuser at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

impl SuperuserConfig {
    /// Both `SUPERUSER_EMAIL` and `SUPERUSER_PASSWORD` must be set, or neither.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        match (env_optional("SUPERUSER_EMAIL"), env_optional("SUPERUSER_PASSWORD")) {
            (Some(email), Some(password)) => Ok(Some(Self { email, password })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("SUPERUSER_PASSWORD".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("SUPERUSER_EMAIL".to_string())),
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub superuser: Option<SuperuserConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?; // Required - will fail if not set
        let cors = CorsConfig::from_env()?;
        let superuser = SuperuserConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            jwt,
            cors,
            superuser,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "scheduler-api-test-secret-32-chars!!";

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/scheduler")),
                ("JWT_SECRET", Some(SECRET)),
                ("PORT", Some("9000")),
                ("SUPERUSER_EMAIL", None),
                ("SUPERUSER_PASSWORD", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "scheduler_api");
                assert_eq!(config.database.url, "postgres://localhost/scheduler");
                assert_eq!(config.server.port, 9000);
                assert!(config.superuser.is_none());
            },
        );
    }

    #[test]
    fn test_config_requires_jwt_secret() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/scheduler")),
                ("JWT_SECRET", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_superuser_needs_both_variables() {
        temp_env::with_vars(
            [
                ("SUPERUSER_EMAIL", Some("admin@example.com")),
                ("SUPERUSER_PASSWORD", None),
            ],
            || {
                assert!(SuperuserConfig::from_env().is_err());
            },
        );

        temp_env::with_vars(
            [
                ("SUPERUSER_EMAIL", Some("admin@example.com")),
                ("SUPERUSER_PASSWORD", Some("change-me-please")),
            ],
            || {
                let superuser = SuperuserConfig::from_env().unwrap().unwrap();
                assert_eq!(superuser.email, "admin@example.com");
            },
        );
    }
}
