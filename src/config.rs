use secrecy::Secret;
use std::fmt;

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Settings for the contact-notification mail API
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub from: String,
    pub to: String,
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: Secret<String>,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub cors_allowed_origins: Vec<String>,
    /// `None` disables contact notifications
    pub mail: Option<MailConfig>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, reason } => write!(f, "{key} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let database_url = require("DATABASE_URL")?;
        let jwt_secret = Secret::new(require("JWT_SECRET")?);

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let environment = match get("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "APP_ENV",
                    reason: format!("expected 'development' or 'production', got '{other}'"),
                })
            }
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mail = Self::mail_from_lookup(&get)?;

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            environment,
            cors_allowed_origins,
            mail,
        })
    }

    /// Mail settings are all-or-nothing; a partial set is a startup error
    fn mail_from_lookup<F>(get: &F) -> Result<Option<MailConfig>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = get("MAIL_API_URL");
        let api_key = get("MAIL_API_KEY");
        let to = get("MAIL_TO");

        match (api_url, api_key, to) {
            (None, None, None) => Ok(None),
            (Some(api_url), Some(api_key), Some(to)) => {
                if !api_url.starts_with("https://") && !api_url.starts_with("http://") {
                    return Err(ConfigError::Invalid {
                        key: "MAIL_API_URL",
                        reason: "must be an http(s) URL".to_string(),
                    });
                }
                let from = get("MAIL_FROM").unwrap_or_else(|| to.clone());
                Ok(Some(MailConfig {
                    api_url,
                    api_key: Secret::new(api_key),
                    from,
                    to,
                }))
            }
            (api_url, api_key, _) => Err(ConfigError::Missing(if api_url.is_none() {
                "MAIL_API_URL"
            } else if api_key.is_none() {
                "MAIL_API_KEY"
            } else {
                "MAIL_TO"
            })),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
