//! Environment-driven application settings.
//!
//! Everything the server needs from its environment is read here through the
//! [`mockable::Env`] abstraction so parsing can be tested without touching the
//! process environment. Debug builds tolerate missing or malformed values,
//! logging a warning and falling back to defaults; release builds reject them.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mockable::Env;
use tracing::warn;
use url::Url;

use crate::outbound::backup_file::DEFAULT_BACKUP_PATH;
use crate::outbound::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::outbound::gold_api::DEFAULT_GOLD_API_BASE_URL;
use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
const GOLD_API_KEY_ENV: &str = "GOLD_API_KEY";
const GOLD_API_BASE_URL_ENV: &str = "GOLD_API_BASE_URL";
const GOLD_BACKUP_PATH_ENV: &str = "GOLD_BACKUP_PATH";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_MAX_CONNECTIONS_ENV: &str = "DATABASE_MAX_CONNECTIONS";
const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
const BIND_ADDR_ENV: &str = "KUBER_BIND_ADDR";

/// Default timeout applied to price and language model requests.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for bad values.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kuber::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// True for [`BuildMode::Debug`].
    pub fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Stand-in printed for credentials in `Debug` output.
const REDACTED: &str = "<redacted>";

/// Gemini language model access.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &REDACTED)
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// GoldAPI.io live price access.
#[derive(Clone, PartialEq, Eq)]
pub struct GoldApiSettings {
    pub api_key: String,
    pub base_url: Url,
}

impl fmt::Debug for GoldApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoldApiSettings")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// PostgreSQL connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// May embed a password, so it never appears in `Debug` output.
    pub url: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &REDACTED)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub bind_addr: SocketAddr,
    /// `None` disables the language model; answers fall back to canned text.
    pub gemini: Option<GeminiSettings>,
    /// `None` disables live prices; only the backup file is used.
    pub gold_api: Option<GoldApiSettings>,
    pub backup_path: PathBuf,
    /// `None` selects the in-memory ledger (debug builds only).
    pub database: Option<DatabaseSettings>,
    pub upstream_timeout: Duration,
}

impl AppSettings {
    /// Read settings from `env` under the rules of `mode`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kuber::settings::{AppSettings, BuildMode};
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "DATABASE_URL" => Some("postgres://localhost/kuber".to_owned()),
    ///     "GOLD_API_KEY" => Some("goldapi-token".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = AppSettings::from_env(&env, BuildMode::Release).expect("valid settings");
    /// assert!(settings.gold_api.is_some());
    /// assert!(settings.gemini.is_none());
    /// ```
    ///
    /// # Errors
    ///
    /// Release builds return [`SettingsError`] for a missing `DATABASE_URL` or
    /// any malformed value.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, SettingsError> {
        let bind_addr = parsed_or_default(
            env,
            mode,
            BIND_ADDR_ENV,
            "a socket address such as 0.0.0.0:8080",
            default_bind_addr(),
        )?;
        let upstream_timeout = parsed_or_default(
            env,
            mode,
            UPSTREAM_TIMEOUT_ENV,
            "a whole number of seconds",
            DEFAULT_UPSTREAM_TIMEOUT.as_secs(),
        )
        .map(Duration::from_secs)?;

        Ok(Self {
            bind_addr,
            gemini: gemini_from_env(env),
            gold_api: gold_api_from_env(env, mode)?,
            backup_path: non_empty(env, GOLD_BACKUP_PATH_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_BACKUP_PATH), PathBuf::from),
            database: database_from_env(env, mode)?,
            upstream_timeout,
        })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn non_empty<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parsed_or_default<E, T>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, SettingsError>
where
    E: Env,
    T: FromStr,
{
    let Some(value) = non_empty(env, name) else {
        return Ok(default);
    };
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) if mode.is_debug() => {
            warn!(variable = name, value = %value, "invalid setting; using default");
            Ok(default)
        }
        Err(_) => Err(SettingsError::InvalidEnv {
            name,
            value,
            expected,
        }),
    }
}

fn gemini_from_env<E: Env>(env: &E) -> Option<GeminiSettings> {
    let Some(api_key) = non_empty(env, GEMINI_API_KEY_ENV) else {
        warn!("GEMINI_API_KEY not set; advisor answers will use fallback text");
        return None;
    };
    let base_url = match Url::parse(DEFAULT_GEMINI_BASE_URL) {
        Ok(url) => url,
        Err(error) => {
            warn!(%error, "invalid built-in Gemini base URL; disabling the language model");
            return None;
        }
    };
    Some(GeminiSettings {
        api_key,
        model: non_empty(env, GEMINI_MODEL_ENV).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_owned()),
        base_url,
    })
}

fn gold_api_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<GoldApiSettings>, SettingsError> {
    let Some(api_key) = non_empty(env, GOLD_API_KEY_ENV) else {
        warn!("GOLD_API_KEY not set; gold prices will come from the backup file");
        return Ok(None);
    };
    let default_url = Url::parse(DEFAULT_GOLD_API_BASE_URL).map_err(|_| {
        SettingsError::InvalidEnv {
            name: GOLD_API_BASE_URL_ENV,
            value: DEFAULT_GOLD_API_BASE_URL.to_owned(),
            expected: "an absolute http(s) URL",
        }
    })?;
    let base_url = parsed_or_default(
        env,
        mode,
        GOLD_API_BASE_URL_ENV,
        "an absolute http(s) URL",
        default_url,
    )?;
    Ok(Some(GoldApiSettings { api_key, base_url }))
}

fn database_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<DatabaseSettings>, SettingsError> {
    let Some(url) = non_empty(env, DATABASE_URL_ENV) else {
        if mode.is_debug() {
            warn!("DATABASE_URL not set; purchases are kept in memory only");
            return Ok(None);
        }
        return Err(SettingsError::MissingEnv {
            name: DATABASE_URL_ENV,
        });
    };
    let max_connections = match parsed_or_default(
        env,
        mode,
        DATABASE_MAX_CONNECTIONS_ENV,
        "a positive integer",
        DEFAULT_MAX_CONNECTIONS,
    )? {
        0 if mode.is_debug() => {
            warn!("DATABASE_MAX_CONNECTIONS=0; using default");
            DEFAULT_MAX_CONNECTIONS
        }
        0 => {
            return Err(SettingsError::InvalidEnv {
                name: DATABASE_MAX_CONNECTIONS_ENV,
                value: "0".to_owned(),
                expected: "a positive integer",
            });
        }
        size => size,
    };
    Ok(Some(DatabaseSettings {
        url,
        max_connections,
    }))
}

#[cfg(test)]
mod tests;
