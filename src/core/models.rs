//! Core data models for the audio extractor

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One audio extraction job. Built once per URL and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub url: String,

    pub output_dir: PathBuf,

    pub audio_format: String,

    pub quality: String,
}

impl ExtractionRequest {
    pub fn new(
        url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        audio_format: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            output_dir: output_dir.into(),
            audio_format: audio_format.into(),
            quality: quality.into(),
        }
    }

    /// yt-dlp output template, e.g. `audio/%(title)s.%(ext)s`
    pub fn output_template(&self) -> String {
        self.output_dir
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned()
    }
}

/// What a backend hands back after a successful download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadedAudio {
    pub title: Option<String>,

    pub file_path: Option<PathBuf>,
}

/// Outcome of a single extraction
#[derive(Debug)]
pub struct ExtractionResult {
    pub url: String,

    pub title: Option<String>,

    pub file_path: Option<PathBuf>,

    pub error: Option<ExtractionError>,
}

impl ExtractionResult {
    pub fn succeeded(url: impl Into<String>, audio: DownloadedAudio) -> Self {
        Self {
            url: url.into(),
            title: audio.title,
            file_path: audio.file_path,
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: ExtractionError) -> Self {
        Self {
            url: url.into(),
            title: None,
            file_path: None,
            error: Some(error),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// Running tally of a batch. Failed URLs keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub success_count: usize,

    pub failure_count: usize,

    pub failed_urls: Vec<String>,
}

impl BatchSummary {
    pub fn record(&mut self, result: &ExtractionResult) {
        if result.success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
            self.failed_urls.push(result.url.clone());
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Console report printed at the end of a batch
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("批量提取音频完成!\n");
        out.push_str(&format!("成功: {} 个\n", self.success_count));
        out.push_str(&format!("失败: {} 个\n", self.failure_count));

        if !self.failed_urls.is_empty() {
            out.push_str("\n失败的URL:\n");
            for url in &self.failed_urls {
                out.push_str(&format!("  - {}\n", url));
            }
        }

        out
    }
}

/// Per-item failures. Never escapes the extractor; always folded into an
/// [`ExtractionResult`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("创建输出目录失败 {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法启动 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("yt-dlp 退出码 {}: {stderr}", describe_exit_code(.exit_code))]
    Process {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("下载失败: {0}")]
    Downloader(String),

    #[error("音频转换失败: {0}")]
    Transcode(String),
}

fn describe_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

/// Startup failures. Each one aborts the run with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("请指定视频URL或包含URL列表的文件")]
    MissingInput,

    #[error("文件不存在: {}", .0.display())]
    InputFileNotFound(PathBuf),

    #[error("读取文件失败 {}: {source}", .path.display())]
    InputFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("文件中没有有效的URL: {}", .0.display())]
    EmptyInputFile(PathBuf),

    #[error("依赖安装失败: {0}")]
    DependencyInstall(String),

    #[error("ffmpeg 未安装")]
    TranscoderMissing,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
