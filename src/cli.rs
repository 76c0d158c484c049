//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::{AppConfig, BackendPreference};
use crate::core::models::{AppError, AppResult};

/// 视频音频提取工具
#[derive(Parser, Debug)]
#[command(name = "audio-extractor")]
#[command(about = "视频音频提取工具：从Bilibili、YouTube等网站的视频中提取音频")]
#[command(version)]
pub struct Cli {
    /// 单个视频的URL（支持Bilibili、YouTube等）
    #[arg(long)]
    pub url: Option<String>,

    /// 包含视频URL列表的文件路径（每行一个URL）
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// 输出音频文件的目录（默认: audio）
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// 音频格式（默认: mp3）
    #[arg(long)]
    pub format: Option<String>,

    /// 音频质量，0-10 或比特率如 128k（默认: 128k）
    #[arg(long)]
    pub quality: Option<String>,

    /// JSON 配置文件路径
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 下载方式
    #[arg(long, value_enum)]
    pub backend: Option<BackendPreference>,

    /// yt-dlp 的安装目录（默认: libs）
    #[arg(long)]
    pub libraries_dir: Option<PathBuf>,

    /// 找不到 yt-dlp 时不自动安装
    #[arg(long)]
    pub no_install: bool,

    /// 未安装 ffmpeg 时直接退出
    #[arg(long)]
    pub require_ffmpeg: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the user asked to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Url(String),
    File(PathBuf),
}

impl Cli {
    /// `--url` wins over `--file` when both are given
    pub fn input(&self) -> AppResult<InputSource> {
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(InputSource::Url(url.to_string()));
        }

        match &self.file {
            Some(path) => Ok(InputSource::File(path.clone())),
            None => Err(AppError::MissingInput),
        }
    }

    /// Overlay command-line flags on a loaded configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(format) = &self.format {
            config.audio_format = format.trim().to_lowercase();
        }
        if let Some(quality) = &self.quality {
            config.audio_quality = quality.trim().to_string();
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(dir) = &self.libraries_dir {
            config.libraries_dir = dir.clone();
        }
        if self.no_install {
            config.auto_install = false;
        }
        if self.require_ffmpeg {
            config.require_transcoder = true;
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
    }

    /// Configuration file, then flags, then validation
    pub fn resolve_config(&self) -> AppResult<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        self.apply_to(&mut config);
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(config)
    }
}
