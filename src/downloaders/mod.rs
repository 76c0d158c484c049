//! Download backends
//!
//! Every backend fetches one URL and leaves an audio file in the request's
//! output directory. Implementations:
//! - `LibraryBackend`: the `yt-dlp` crate plus an ffmpeg post-processing step.
//!   Its metadata model only describes YouTube videos.
//! - `ProcessBackend`: the yt-dlp command line with `-x`, for every site
//! - `RoutedBackend`: YouTube URLs to the library, the rest to the command line

pub mod library_backend;
pub mod process_backend;
pub mod transcoder;

pub use library_backend::LibraryBackend;
pub use process_backend::ProcessBackend;
pub use transcoder::Transcoder;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::core::config::BackendPreference;
use crate::core::dependency_checker::{DependencyReport, DownloaderLocation};
use crate::core::models::{DownloadedAudio, ExtractionError, ExtractionRequest};
use crate::utils::validation::is_youtube_url;

/// Capability shared by all download strategies
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    /// Short name shown in the console report
    fn name(&self) -> &'static str;

    /// Download `request.url` and extract its audio into `request.output_dir`.
    ///
    /// The output directory already exists when this is called.
    async fn download_audio(
        &self,
        request: &ExtractionRequest,
    ) -> Result<DownloadedAudio, ExtractionError>;
}

/// Routes each URL by host.
///
/// YouTube URLs go to the library backend and fall back to the command line
/// once if it fails; every other URL goes straight to the command line.
pub struct RoutedBackend {
    library: Box<dyn DownloadBackend>,
    process: Box<dyn DownloadBackend>,
}

impl RoutedBackend {
    pub fn new(library: Box<dyn DownloadBackend>, process: Box<dyn DownloadBackend>) -> Self {
        Self { library, process }
    }
}

#[async_trait]
impl DownloadBackend for RoutedBackend {
    fn name(&self) -> &'static str {
        "auto"
    }

    async fn download_audio(
        &self,
        request: &ExtractionRequest,
    ) -> Result<DownloadedAudio, ExtractionError> {
        if !is_youtube_url(&request.url) {
            debug!("Routing {} to the {} backend", request.url, self.process.name());
            return self.process.download_audio(request).await;
        }

        debug!("Routing {} to the {} backend", request.url, self.library.name());
        match self.library.download_audio(request).await {
            Ok(audio) => Ok(audio),
            Err(e) => {
                warn!(
                    "⚠️ {} backend failed for {} ({}), retrying with {}",
                    self.library.name(),
                    request.url,
                    e,
                    self.process.name()
                );
                self.process.download_audio(request).await
            }
        }
    }
}

/// Pick a backend from what the dependency check found.
///
/// The library backend needs a yt-dlp executable and a located ffmpeg for its
/// post-processing step. Under `auto` it only serves YouTube URLs; anything
/// else runs yt-dlp as a process.
pub fn select_backend(
    preference: BackendPreference,
    report: &DependencyReport,
) -> Box<dyn DownloadBackend> {
    let process = || -> Box<dyn DownloadBackend> {
        Box::new(ProcessBackend::new(
            report.downloader.clone(),
            report.transcoder.clone(),
        ))
    };

    if preference == BackendPreference::Process {
        info!("Using yt-dlp process backend (forced)");
        return process();
    }

    let library = match (&report.downloader, &report.transcoder) {
        (DownloaderLocation::Binary(yt_dlp), Some(ffmpeg)) => {
            Some(LibraryBackend::new(yt_dlp.clone(), ffmpeg.clone()))
        }
        _ => None,
    };

    match (library, preference) {
        (Some(backend), BackendPreference::Library) => {
            info!("Using yt-dlp library backend (forced)");
            Box::new(backend)
        }
        (Some(backend), _) => {
            info!("Using yt-dlp library backend for YouTube, process backend for other sites");
            Box::new(RoutedBackend::new(Box::new(backend), process()))
        }
        (None, BackendPreference::Library) => {
            warn!("yt-dlp library backend unavailable, falling back to the command line");
            process()
        }
        (None, _) => {
            info!("Using yt-dlp process backend");
            process()
        }
    }
}
