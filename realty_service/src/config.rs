use std::{
    env,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use config::{Config, Environment, File};
use realty_query::query::{list::ListQueryConfig, paginate::PaginatorConfig};
use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
///
/// Contains all configuration settings for the realty service,
/// including query limits, database and tracing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Distribution metadata configuration
    pub distribution: DistributionConfig,
    /// List query limits
    #[serde(default)]
    pub query: QuerySettings,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Tracing configuration
    pub tracing: TracingConfig,
}

/// Limits applied to list operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Cap on results of reads that are not paginated.
    pub max_unpaginated_results: u64,
}

/// Database configuration.
///
/// Supports either in-memory storage or a MongoDB database.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum DatabaseConfig {
    /// In-memory document storage, optionally seeded from a JSON file
    /// mapping collection names to document arrays.
    Memory {
        #[serde(default)]
        seed: Option<PathBuf>,
    },
    /// MongoDB database connection
    MongoDb(MongoDbConfig),
}

/// MongoDB database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    /// MongoDB connection string
    pub uri: String,
    /// Database name
    pub database: String,
}

/// Tracing configuration.
///
/// Controls how tracing data is output from the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum TracingConfig {
    /// In-memory tracing (no output)
    Memory,
    /// Standard output tracing
    Stdout,
}

/// Distribution metadata configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionConfig {
    /// Distribution name
    pub name: String,
    /// Distribution version
    pub version: Option<String>,
}

const CONFIG_PATH_ENV: &str = "REALTY_CONFIG_PATH";
const ENV_PREFIX: &str = "REALTY";
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DISTRIBUTION_VERSION_KEY: &str = "distribution.version";

impl Default for QuerySettings {
    fn default() -> Self {
        let list = ListQueryConfig::default();
        Self {
            default_page_size: list.default_page_size,
            max_page_size: list.max_page_size,
            max_unpaginated_results: PaginatorConfig::default().max_unpaginated_results,
        }
    }
}

impl QuerySettings {
    pub fn list_query_config(&self) -> ListQueryConfig {
        ListQueryConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }

    pub fn paginator_config(&self) -> PaginatorConfig {
        PaginatorConfig {
            max_unpaginated_results: self.max_unpaginated_results,
        }
    }
}

impl AppConfig {
    /// Gets the global application configuration instance.
    ///
    /// Uses a static `OnceLock` to ensure the configuration is loaded only once.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded on first access.
    pub fn get() -> AppResult<&'static Self> {
        static INSTANCE: OnceLock<AppConfig> = OnceLock::new();
        if let Some(config) = INSTANCE.get() {
            return Ok(config);
        }
        let config = Self::load()?;
        Ok(INSTANCE.get_or_init(|| config))
    }

    /// Loads configuration from files and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> AppResult<Self> {
        let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Loads configuration rooted at `config_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let mut config_builder =
            Config::builder().set_default(DISTRIBUTION_VERSION_KEY, VERSION)?;

        // Initial "default" configuration file
        let default_path = config_path.join("default");
        config_builder =
            config_builder.add_source(File::with_name(&default_path.to_string_lossy()));

        // Add in a local configuration file
        // This file shouldn't be checked in to git
        let local_path = config_path.join("local");
        config_builder = config_builder
            .add_source(File::with_name(&local_path.to_string_lossy()).required(false));

        // Add override settings file.
        let override_path = env::var(CONFIG_PATH_ENV).ok();
        if let Some(override_path) = override_path {
            config_builder =
                config_builder.add_source(File::with_name(&override_path).required(false));
        }

        // Add in settings from the environment (with a prefix of REALTY)
        config_builder =
            config_builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        Ok(config_builder.build()?.try_deserialize()?)
    }
}
