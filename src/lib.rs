pub mod config;
pub mod fetcher;
pub mod log_sink;
pub mod models;
pub mod orchestrator;
pub mod plugins;
pub mod rate_limiter;
pub mod retry;
pub mod robots;
pub mod scheduler;
pub mod status;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use orchestrator::{RunSummary, ScrapeOrchestrator};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
