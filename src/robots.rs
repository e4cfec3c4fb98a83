//! robots.txt admission with an on-disk, per-domain cache.
//!
//! A domain's policy is either uncached, fresh (younger than the TTL) or
//! stale. Stale and uncached policies are fetched before use; a failed
//! fetch leaves whatever is on disk in place. With no policy on disk at all
//! the gate refuses the URL.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use url::Url;

use crate::fetcher::Fetcher;
use crate::models::domain_of;
use crate::utils::ContentDecompressor;
use crate::utils::error::{AppError, Result};

const WILDCARD_AGENT: &str = "*";

pub struct RobotsComplianceGate {
    fetcher: Fetcher,
    cache_dir: PathBuf,
    ttl: Duration,
}

impl RobotsComplianceGate {
    pub fn new(fetcher: Fetcher, cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            fetcher,
            cache_dir: cache_dir.into(),
            ttl,
        }
    }

    /// Cache file for `domain`, which is expected to be `www.`-stripped already.
    pub fn cache_path(&self, domain: &str) -> PathBuf {
        let file_name: String = domain
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("{}.txt", file_name))
    }

    /// True only when a cache file exists and is no older than the TTL.
    pub async fn is_cached(&self, domain: &str) -> bool {
        let Ok(metadata) = tokio::fs::metadata(self.cache_path(domain)).await else {
            return false;
        };
        let Ok(modified) = metadata.modified() else {
            return false;
        };
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        age <= self.ttl
    }

    /// Fetches `{scheme}://{host}/robots.txt` and stores the body verbatim.
    ///
    /// Fetch failures are logged and leave the existing cache untouched; only
    /// failures to write the cache are returned.
    pub async fn cache_policy(&self, url: &Url) -> Result<()> {
        let domain = domain_of(url).ok_or_else(|| AppError::Robots {
            domain: url.to_string(),
            message: "URL has no host".to_string(),
        })?;
        let robots_url = url.join("/robots.txt")?;

        let response = match self.fetcher.get(&robots_url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(domain = %domain, url = %robots_url, error = %e, "could not fetch robots.txt");
                return Ok(());
            }
        };

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(self.cache_path(&domain), &response.body).await?;
        tracing::debug!(domain = %domain, bytes = response.body.len(), "cached robots.txt");
        Ok(())
    }

    /// Decides whether `url` may be fetched, refreshing the cached policy first if needed.
    ///
    /// Returns an error only when the cache itself cannot be written.
    pub async fn check_allowed(&self, url: &Url) -> Result<bool> {
        let Some(domain) = domain_of(url) else {
            return Ok(false);
        };

        if !self.is_cached(&domain).await {
            self.cache_policy(url).await?;
        }

        let bytes = match tokio::fs::read(self.cache_path(&domain)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(domain = %domain, error = %e, "could not read cached robots.txt");
                }
                tracing::info!(domain = %domain, "no robots policy available, refusing");
                return Ok(false);
            }
        };

        // The cache holds the body as served, which may still be gzip-encoded.
        let policy = match ContentDecompressor::new().decompress_to_string(&bytes) {
            Ok(policy) => policy,
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "could not decode cached robots.txt, refusing");
                return Ok(false);
            }
        };

        let allowed = is_path_allowed(&policy, &request_path(url));
        if !allowed {
            tracing::debug!(url = %url, "disallowed by robots.txt");
        }
        Ok(allowed)
    }
}

fn request_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// `Disallow` prefixes declared for the wildcard user agent, lowercased.
pub fn disallowed_prefixes(policy: &str) -> Vec<String> {
    let mut current_agent = WILDCARD_AGENT.to_string();
    let mut prefixes = Vec::new();

    for line in policy.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let Some((directive, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match directive.trim().to_ascii_lowercase().as_str() {
            "user-agent" => current_agent = value.to_string(),
            // An empty Disallow allows everything, so it contributes no prefix.
            "disallow" if current_agent == WILDCARD_AGENT && !value.is_empty() => {
                prefixes.push(value.to_lowercase());
            }
            _ => {}
        }
    }

    prefixes
}

/// A path is allowed when no wildcard-agent prefix matches it, ignoring case.
pub fn is_path_allowed(policy: &str, path: &str) -> bool {
    let path = path.to_lowercase();
    !disallowed_prefixes(policy)
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
}
