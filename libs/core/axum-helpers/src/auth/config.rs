use core_config::{ConfigError, FromEnv, env_parse, env_required};

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_LIFETIME_SECONDS: i64 = 3600;

/// Loaded from `JWT_SECRET` (required, at least 32 characters) and
/// `JWT_LIFETIME_SECONDS` (default 3600).
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub lifetime_seconds: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;

        Ok(Self {
            secret,
            lifetime_seconds: DEFAULT_LIFETIME_SECONDS,
        })
    }

    pub fn with_lifetime(mut self, seconds: i64) -> Self {
        self.lifetime_seconds = seconds;
        self
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        let lifetime_seconds = env_parse("JWT_LIFETIME_SECONDS", DEFAULT_LIFETIME_SECONDS)?;
        if lifetime_seconds <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_LIFETIME_SECONDS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self {
            secret,
            lifetime_seconds,
        })
    }
}
