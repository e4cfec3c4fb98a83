use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub robots_cache_dir: PathBuf,
    pub robots_ttl_hours: u64,
    pub cooldown_ms: u64,
    pub cooldown_poll_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub max_concurrent_domains: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub tick_interval_secs: u64,
    pub update_threshold_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn robots_ttl(&self) -> Duration {
        Duration::from_secs(self.robots_ttl_hours * 60 * 60)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn cooldown_poll(&self) -> Duration {
        Duration::from_millis(self.cooldown_poll_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: "PriceScraper/0.1 (+https://github.com/yourusername/price-scraper)".to_string(),
            request_timeout_secs: 30,
            robots_cache_dir: PathBuf::from("data/robots"),
            robots_ttl_hours: 24,
            cooldown_ms: 2000,
            cooldown_poll_ms: 100,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            max_concurrent_domains: 1,
        }
    }
}

impl SchedulerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn update_threshold(&self) -> chrono::Duration {
        chrono::Duration::hours(self.update_threshold_hours as i64)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 300,
            update_threshold_hours: 12,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "SCRAPER_"
            .add_source(Environment::with_prefix("SCRAPER").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::Message("Database url must use the sqlite: scheme".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message("Database max_connections must be greater than 0".into()));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent must not be empty".into()));
        }

        if self.scraper.request_timeout_secs == 0 {
            return Err(ConfigError::Message("Scraper request_timeout_secs must be greater than 0".into()));
        }

        if self.scraper.robots_ttl_hours == 0 {
            return Err(ConfigError::Message("Scraper robots_ttl_hours must be greater than 0".into()));
        }

        if self.scraper.cooldown_poll_ms == 0 {
            return Err(ConfigError::Message("Scraper cooldown_poll_ms must be greater than 0".into()));
        }

        if self.scraper.max_concurrent_domains == 0 {
            return Err(ConfigError::Message("Scraper max_concurrent_domains must be greater than 0".into()));
        }

        if self.scheduler.tick_interval_secs == 0 {
            return Err(ConfigError::Message("Scheduler tick_interval_secs must be greater than 0".into()));
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::Message("Metrics port must be greater than 0".into()));
        }

        Ok(())
    }
}
