//! URL and input validation utilities

use anyhow::{anyhow, Result};
use url::Url;

/// Validate URL format
pub fn validate_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| anyhow!("Invalid URL format: {}", e))
}

/// Check if URL is an http(s) link yt-dlp can be pointed at
pub fn is_valid_video_url(url: &str) -> bool {
    if let Ok(parsed) = validate_url(url) {
        let scheme = parsed.scheme();
        scheme == "http" || scheme == "https"
    } else {
        false
    }
}

/// Domains served by YouTube, subdomains included
const YOUTUBE_DOMAINS: [&str; 3] = ["youtube.com", "youtu.be", "youtube-nocookie.com"];

/// Check if URL points at a YouTube host
pub fn is_youtube_url(url: &str) -> bool {
    let host = match validate_url(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return false,
        },
        Err(_) => return false,
    };

    YOUTUBE_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}
