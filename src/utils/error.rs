use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Robots policy error for {domain}: {message}")]
    Robots { domain: String, message: String },

    #[error("No parser registered for {domain}")]
    ParserMissing { domain: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Run already in progress")]
    RunInProgress,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status carried by a transport error, if the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            AppError::HttpStatus { status, .. } => Some(*status),
            AppError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
