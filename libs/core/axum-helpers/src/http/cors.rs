use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv, env_optional};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_ORIGINS: [&str; 3] = [
    "http://localhost",
    "http://localhost:8080",
    "http://localhost:5173",
];

/// Origins allowed to call the API from a browser.
///
/// `CORS_ALLOWED_ORIGIN` holds a comma-separated list; when unset the local
/// development origins are allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let Some(raw) = env_optional("CORS_ALLOWED_ORIGIN") else {
            return Ok(Self::default());
        };

        let allowed_origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        for origin in &allowed_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: format!("{origin}: {e}"),
            })?;
        }

        Ok(Self { allowed_origins })
    }
}

/// Credentials are allowed, so origins are always an explicit list.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
