//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Audio formats understood by yt-dlp's `--audio-format`
pub const SUPPORTED_AUDIO_FORMATS: [&str; 9] = [
    "best", "aac", "alac", "flac", "m4a", "mp3", "opus", "vorbis", "wav",
];

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Which download backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Library first, external process when the library cannot run
    Auto,
    Library,
    Process,
}

impl Default for BackendPreference {
    fn default() -> Self {
        Self::Auto
    }
}

/// Main application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub audio_format: String,
    pub audio_quality: String, // "0".."10" (VBR) or a bitrate such as "128k"
    /// Where yt-dlp (and optionally ffmpeg) binaries are installed
    pub libraries_dir: PathBuf,
    pub backend: BackendPreference,
    /// Install yt-dlp into `libraries_dir` when it cannot be found
    pub auto_install: bool,
    /// Abort instead of warning when ffmpeg is missing
    pub require_transcoder: bool,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("audio"),
            audio_format: "mp3".to_string(),
            audio_quality: "128k".to_string(),
            libraries_dir: PathBuf::from("libs"),
            backend: BackendPreference::Auto,
            auto_install: true,
            require_transcoder: false,
            log_level: "info".to_string(),
        }
    }
}

fn quality_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+[kK]?$").expect("valid quality regex"))
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::get_config_path() {
                Ok(config_path) if config_path.exists() => Self::load_from(&config_path),
                Ok(config_path) => {
                    tracing::debug!("No configuration at {:?}, using defaults", config_path);
                    Ok(Self::default())
                }
                Err(e) => {
                    tracing::debug!("{}, using defaults", e);
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::info!("Loaded configuration from: {:?}", path);
        Ok(config)
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "videodownloader", "audio-extractor")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }

        if !SUPPORTED_AUDIO_FORMATS.contains(&self.audio_format.as_str()) {
            anyhow::bail!(
                "Invalid audio format: {} (expected one of {})",
                self.audio_format,
                SUPPORTED_AUDIO_FORMATS.join(", ")
            );
        }

        if !quality_pattern().is_match(&self.audio_quality) {
            anyhow::bail!(
                "Invalid audio quality: {} (use 0-10 for VBR or a bitrate like 128k)",
                self.audio_quality
            );
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level: must be 'error', 'warn', 'info', 'debug', or 'trace'"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_dir, PathBuf::from("audio"));
        assert_eq!(config.audio_format, "mp3");
        assert_eq!(config.audio_quality, "128k");
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = AppConfig::default();
        config.audio_format = "mp4".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.audio_quality = "high".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.output_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quality_forms() {
        let mut config = AppConfig::default();
        for quality in ["0", "5", "10", "128k", "320K", "192"] {
            config.audio_quality = quality.to_string();
            assert!(config.validate().is_ok(), "{} should be accepted", quality);
        }
    }

    #[test]
    fn test_load_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.audio_format = "opus".to_string();
        config.backend = BackendPreference::Process;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "audio_quality": "320k" }"#).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.audio_quality, "320k");
        assert_eq!(loaded.audio_format, "mp3");
        assert!(loaded.auto_install);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.json"))).is_err());
    }
}
