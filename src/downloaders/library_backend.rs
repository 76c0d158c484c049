//! yt-dlp library backend
//!
//! Uses the `yt-dlp` crate to read the media title and fetch the best audio
//! stream, then runs the ffmpeg post-processing step to reach the requested
//! format and quality.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use yt_dlp::fetcher::deps::Libraries;
use yt_dlp::Youtube;

use super::transcoder::{AudioTarget, Transcoder};
use super::DownloadBackend;
use crate::core::models::{DownloadedAudio, ExtractionError, ExtractionRequest};
use crate::utils::file_utils::sanitize_filename;

/// Extension of the raw stream before post-processing
const RAW_STREAM_EXTENSION: &str = "download";

pub struct LibraryBackend {
    yt_dlp: PathBuf,
    ffmpeg: PathBuf,
}

impl LibraryBackend {
    pub fn new(yt_dlp: PathBuf, ffmpeg: PathBuf) -> Self {
        Self { yt_dlp, ffmpeg }
    }

    fn fetcher(&self, request: &ExtractionRequest) -> Result<Youtube, ExtractionError> {
        let libraries = Libraries::new(self.yt_dlp.clone(), self.ffmpeg.clone());
        Youtube::new(libraries, request.output_dir.clone())
            .map_err(|e| ExtractionError::Downloader(e.to_string()))
    }
}

/// File names used for one title: the raw stream and the final audio file
pub fn output_names(title: &str, target: &AudioTarget) -> (String, String) {
    let stem = sanitize_filename(title);
    (
        format!("{}.{}", stem, RAW_STREAM_EXTENSION),
        format!("{}.{}", stem, target.extension),
    )
}

#[async_trait]
impl DownloadBackend for LibraryBackend {
    fn name(&self) -> &'static str {
        "library"
    }

    async fn download_audio(
        &self,
        request: &ExtractionRequest,
    ) -> Result<DownloadedAudio, ExtractionError> {
        let target = AudioTarget::for_format(&request.audio_format).ok_or_else(|| {
            ExtractionError::Transcode(format!("不支持的音频格式: {}", request.audio_format))
        })?;

        let fetcher = self.fetcher(request)?;

        info!("使用yt-dlp模块提取音频: {}", request.url);
        let video = fetcher
            .fetch_video_infos(request.url.clone())
            .await
            .map_err(|e| ExtractionError::Downloader(e.to_string()))?;
        let title = video.title.clone();
        debug!("Fetched video info: {}", title);

        let (raw_name, final_name) = output_names(&title, &target);
        let raw_path = fetcher
            .download_audio_stream(&video, &raw_name)
            .await
            .map_err(|e| ExtractionError::Downloader(e.to_string()))?;

        let final_path = request.output_dir.join(final_name);
        let transcoder = Transcoder::new(self.ffmpeg.clone());
        let converted = transcoder
            .convert(&raw_path, &final_path, &target, &request.quality)
            .await;

        if let Err(e) = tokio::fs::remove_file(&raw_path).await {
            warn!("Failed to remove raw stream {}: {}", raw_path.display(), e);
        }
        converted?;

        Ok(DownloadedAudio {
            title: Some(title),
            file_path: Some(final_path),
        })
    }
}
