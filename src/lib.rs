//! Video Audio Extractor - Core Library
//!
//! Extracts the audio track of online videos with yt-dlp and ffmpeg, either
//! for a single URL or for a file holding one URL per line.

pub mod cli;
pub mod core;
pub mod downloaders;
pub mod utils;

// Re-export commonly used types
pub use crate::cli::{Cli, InputSource};
pub use crate::core::{
    config::{AppConfig, BackendPreference},
    dependency_checker::{DependencyChecker, DependencyReport},
    extractor::AudioExtractor,
    file_parser::UrlListParser,
    models::{AppError, AppResult, BatchSummary, ExtractionRequest, ExtractionResult},
};

use tracing::info;

use crate::core::batch::run_batch;
use crate::downloaders::select_backend;

/// Work prepared from the command line, before any dependency is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Single(ExtractionRequest),
    Batch(Vec<ExtractionRequest>),
}

/// What a finished run produced
#[derive(Debug)]
pub enum RunOutcome {
    Single(ExtractionResult),
    Batch(BatchSummary),
}

/// One invocation of the tool
pub struct Application {
    config: AppConfig,
    checker: DependencyChecker,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        let checker = DependencyChecker::new(config.libraries_dir.clone())
            .with_auto_install(config.auto_install)
            .with_require_transcoder(config.require_transcoder);
        Self { config, checker }
    }

    pub fn with_checker(mut self, checker: DependencyChecker) -> Self {
        self.checker = checker;
        self
    }

    fn request(&self, url: impl Into<String>) -> ExtractionRequest {
        ExtractionRequest::new(
            url,
            self.config.output_dir.clone(),
            self.config.audio_format.clone(),
            self.config.audio_quality.clone(),
        )
    }

    /// Turn the input into requests. A URL file is read completely here.
    pub fn prepare(&self, input: &InputSource) -> AppResult<Job> {
        match input {
            InputSource::Url(url) => Ok(Job::Single(self.request(url.clone()))),
            InputSource::File(path) => {
                let (urls, stats) = UrlListParser::new().parse(path)?;
                println!("从文件中读取到 {} 个URL", urls.len());
                if stats.suspicious_lines > 0 {
                    println!("其中 {} 行看起来不是有效的链接", stats.suspicious_lines);
                }
                Ok(Job::Batch(
                    urls.into_iter().map(|url| self.request(url)).collect(),
                ))
            }
        }
    }

    /// Run a prepared job with the given extractor
    pub async fn execute(&self, job: &Job, extractor: &AudioExtractor) -> RunOutcome {
        match job {
            Job::Single(request) => RunOutcome::Single(extractor.extract(request).await),
            Job::Batch(requests) => RunOutcome::Batch(run_batch(extractor, requests).await),
        }
    }

    /// Prepare, check dependencies, pick a backend, then extract
    pub async fn run(&self, input: &InputSource) -> AppResult<RunOutcome> {
        let job = self.prepare(input)?;

        let report = self.checker.ensure_dependencies().await?;
        let backend = select_backend(self.config.backend, &report);
        info!("🚀 Starting extraction with the {} backend", backend.name());

        let extractor = AudioExtractor::new(backend);
        Ok(self.execute(&job, &extractor).await)
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dependency_checker::DownloaderInstaller;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const MISSING: &str = "definitely-not-installed-tool-7f3a";

    struct UnreachableInstaller;

    #[async_trait]
    impl DownloaderInstaller for UnreachableInstaller {
        async fn install(&self, _libraries_dir: &Path) -> AppResult<PathBuf> {
            Err(AppError::DependencyInstall("network unreachable".to_string()))
        }
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "video-audio-extractor");
    }

    #[test]
    fn test_prepare_single_url_uses_config() {
        let config = AppConfig {
            output_dir: PathBuf::from("music"),
            audio_format: "opus".to_string(),
            audio_quality: "96k".to_string(),
            ..AppConfig::default()
        };
        let app = Application::new(config);

        let job = app
            .prepare(&InputSource::Url("https://example.com/v1".to_string()))
            .unwrap();
        assert_eq!(
            job,
            Job::Single(ExtractionRequest::new(
                "https://example.com/v1",
                "music",
                "opus",
                "96k"
            ))
        );
    }

    #[test]
    fn test_prepare_file_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "https://a.example/1\n\n  https://b.example/2  \n").unwrap();

        let app = Application::new(AppConfig::default());
        match app.prepare(&InputSource::File(path)).unwrap() {
            Job::Batch(requests) => {
                let urls: Vec<_> = requests.iter().map(|r| r.url.as_str()).collect();
                assert_eq!(urls, ["https://a.example/1", "https://b.example/2"]);
            }
            other => panic!("expected a batch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_dependency_check() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let app = Application::new(AppConfig::default());
        let err = app.run(&InputSource::File(missing)).await.unwrap_err();
        assert!(matches!(err, AppError::InputFileNotFound(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_failed_install_aborts_run() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            output_dir: dir.path().join("audio"),
            libraries_dir: dir.path().join("libs"),
            ..AppConfig::default()
        };
        let checker = DependencyChecker::new(&config.libraries_dir)
            .with_programs(MISSING, MISSING, MISSING)
            .with_installer(Box::new(UnreachableInstaller));
        let app = Application::new(config).with_checker(checker);

        let err = app
            .run(&InputSource::Url("https://example.com/v1".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DependencyInstall(_)));
        assert_eq!(err.exit_code(), 1);
        // nothing was extracted
        assert!(!dir.path().join("audio").exists());
    }
}
