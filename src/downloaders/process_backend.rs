//! yt-dlp command line backend

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use super::DownloadBackend;
use crate::core::dependency_checker::DownloaderLocation;
use crate::core::models::{DownloadedAudio, ExtractionError, ExtractionRequest};

/// Printed once the file reached its final path: `<title>\t<filepath>`
const PRINT_TEMPLATE: &str = "after_move:%(title)s\t%(filepath)s";

/// Runs `yt-dlp -x` for each request
pub struct ProcessBackend {
    downloader: DownloaderLocation,
    ffmpeg_location: Option<PathBuf>,
}

impl ProcessBackend {
    pub fn new(downloader: DownloaderLocation, ffmpeg_location: Option<PathBuf>) -> Self {
        Self {
            downloader,
            ffmpeg_location,
        }
    }

    /// yt-dlp arguments for one request
    pub fn build_args(&self, request: &ExtractionRequest) -> Vec<String> {
        let mut args = vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            request.audio_format.clone(),
            "--audio-quality".to_string(),
            request.quality.clone(),
            "-o".to_string(),
            request.output_template(),
            "--print".to_string(),
            PRINT_TEMPLATE.to_string(),
        ];

        // a bare program name is found through PATH by yt-dlp itself
        if let Some(ffmpeg) = &self.ffmpeg_location {
            if ffmpeg.parent().map_or(false, |p| !p.as_os_str().is_empty()) {
                args.push("--ffmpeg-location".to_string());
                args.push(ffmpeg.to_string_lossy().into_owned());
            }
        }

        args.push(request.url.clone());
        args
    }
}

/// Pull title and final path out of yt-dlp's `--print` output
pub fn parse_print_output(stdout: &str) -> DownloadedAudio {
    let line = stdout
        .lines()
        .rev()
        .find(|line| line.contains('\t'));

    match line.and_then(|line| line.split_once('\t')) {
        Some((title, path)) => DownloadedAudio {
            title: Some(title.trim().to_string()).filter(|t| !t.is_empty() && t != "NA"),
            file_path: Some(PathBuf::from(path.trim())).filter(|p| !p.as_os_str().is_empty()),
        },
        None => DownloadedAudio::default(),
    }
}

#[async_trait]
impl DownloadBackend for ProcessBackend {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn download_audio(
        &self,
        request: &ExtractionRequest,
    ) -> Result<DownloadedAudio, ExtractionError> {
        let args = self.build_args(request);
        info!(
            "执行命令: {} {}",
            self.downloader.describe(),
            args.join(" ")
        );

        let output = self
            .downloader
            .command()
            .args(&args)
            .output()
            .await
            .map_err(|source| ExtractionError::Spawn {
                program: self.downloader.describe(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Process {
                exit_code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("yt-dlp output: {}", stdout.trim());

        Ok(parse_print_output(&stdout))
    }
}
