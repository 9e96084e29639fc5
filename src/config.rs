use std::{fmt, path::Path};

use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::{errors::Error, internal_sqlite::connection::DEFAULT_BUSY_TIMEOUT_MS};

/// Environment variables overriding file values, e.g. `SQLMAPPER_URL`.
pub const ENV_PREFIX: &str = "SQLMAPPER";

const SUPPORTED_DRIVERS: [&str; 3] = ["sqlite", "sqlite3", "org.sqlite.JDBC"];

/// Everything needed to open a connection. Kept for the lifetime of an
/// executor; every operation opens its own connection from it.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    pub url: String,
    /// SQLite has no users, kept for callers that carry one anyway
    #[serde(default)]
    pub principal: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

fn default_driver() -> String {
    "sqlite".to_string()
}

fn default_busy_timeout_ms() -> u32 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("principal", &self.principal)
            .field("credential", &"<redacted>")
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(
        driver: impl Into<String>,
        url: impl Into<String>,
        principal: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        ConnectionConfig {
            driver: driver.into(),
            url: url.into(),
            principal: principal.into(),
            credential: credential.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Load configuration with priority: ENV > config file > defaults
    pub fn load(file: Option<&Path>) -> Result<Self, Error> {
        Self::layered(file, None, None)
    }

    /// Same as [`ConnectionConfig::load`], reading `SQLMAPPER_*` variables
    /// from `env` instead of the process environment when given.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, Error> {
        Self::layered(file, env, None)
    }

    /// Like [`ConnectionConfig::load`] with `url` (a CLI flag) on top of every
    /// other layer. Only the url is replaced.
    pub fn load_with_url(file: Option<&Path>, url: Option<&str>) -> Result<Self, Error> {
        Self::layered(file, None, url)
    }

    fn layered(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
        url: Option<&str>,
    ) -> Result<Self, Error> {
        let mut builder = Config::builder()
            .set_default("driver", default_driver())?
            .set_default("busy_timeout_ms", i64::from(DEFAULT_BUSY_TIMEOUT_MS))?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
            tracing::debug!(path = %path.display(), "loading connection config");
        }

        // try_parsing turns "250" into an integer for busy_timeout_ms
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        if let Some(url) = url {
            builder = builder.set_override("url", url)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Checks the driver identifier, the only registration step SQLite needs.
    pub fn validate(&self) -> Result<(), Error> {
        let supported = SUPPORTED_DRIVERS
            .iter()
            .any(|driver| driver.eq_ignore_ascii_case(&self.driver));

        if supported {
            Ok(())
        } else {
            Err(Error::UnsupportedDriver {
                driver: self.driver.clone(),
            })
        }
    }

    /// The file name handed to sqlite3_open_v2, with any URL scheme removed.
    pub fn database_path(&self) -> &str {
        let url = self.url.trim();
        ["jdbc:sqlite:", "sqlite://", "sqlite:"]
            .iter()
            .find_map(|prefix| url.strip_prefix(prefix))
            .unwrap_or(url)
    }

    pub fn is_memory(&self) -> bool {
        let path = self.database_path();
        path == ":memory:" || path.contains("mode=memory")
    }
}
