use uuid::Uuid;

pub mod listing;
pub mod product;
pub mod scraper_status;
pub mod vendor;

// Re-exports for convenience
pub use listing::*;
pub use product::*;
pub use scraper_status::*;
pub use vendor::*;

// Helper function to generate UUIDs in the format expected by the database
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Lowercased host with any leading `www.` removed.
///
/// This is the key used for parser lookup, cooldowns and the robots cache.
pub fn domain_of(url: &url::Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    if host.is_empty() { None } else { Some(host) }
}
