use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("video_audio_extractor={level},yt_dlp=warn")
}

/// Initialize tracing on stderr; stdout is kept for the user-facing report.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("debug"), "video_audio_extractor=debug,yt_dlp=warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing("info");
        init_tracing("debug");
    }
}
