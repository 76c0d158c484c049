//! External tool discovery and installation
//!
//! ffmpeg is only verified; yt-dlp is installed into the libraries directory
//! when it cannot be found anywhere.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use yt_dlp::fetcher::deps::LibraryInstaller;

use crate::core::models::{AppError, AppResult};
use crate::core::report;

/// Where the yt-dlp downloader lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloaderLocation {
    /// A `yt-dlp` executable, either a path or a name resolved through `PATH`
    Binary(PathBuf),
    /// Only the Python module is installed, run as `<interpreter> -m yt_dlp`
    PythonModule { interpreter: String },
}

impl DownloaderLocation {
    /// Base command, ready for yt-dlp arguments
    pub fn command(&self) -> Command {
        match self {
            Self::Binary(path) => Command::new(path),
            Self::PythonModule { interpreter } => {
                let mut command = Command::new(interpreter);
                command.args(["-m", "yt_dlp"]);
                command
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Binary(path) => path.display().to_string(),
            Self::PythonModule { interpreter } => format!("{} -m yt_dlp", interpreter),
        }
    }
}

/// Result of the startup dependency check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    /// `None` when ffmpeg could not be found; extraction may still be attempted
    pub transcoder: Option<PathBuf>,
    pub downloader: DownloaderLocation,
}

/// Installs the downloader when it is missing
#[async_trait]
pub trait DownloaderInstaller: Send + Sync {
    async fn install(&self, libraries_dir: &Path) -> AppResult<PathBuf>;
}

/// Fetches the yt-dlp release binary through the `yt-dlp` crate
pub struct YtDlpReleaseInstaller;

#[async_trait]
impl DownloaderInstaller for YtDlpReleaseInstaller {
    async fn install(&self, libraries_dir: &Path) -> AppResult<PathBuf> {
        std::fs::create_dir_all(libraries_dir).map_err(|e| {
            AppError::DependencyInstall(format!(
                "无法创建目录 {}: {}",
                libraries_dir.display(),
                e
            ))
        })?;

        let installer = LibraryInstaller::new(libraries_dir.to_path_buf());
        installer
            .install_youtube(None)
            .await
            .map_err(|e| AppError::DependencyInstall(e.to_string()))
    }
}

/// Platform file name of an executable
pub fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// Run a tool and report whether it exited successfully.
///
/// A missing or non-executable program is `Ok(false)`; other spawn errors
/// are returned.
pub async fn check_tool_availability(
    tool: impl AsRef<OsStr>,
    args: &[&str],
) -> AppResult<bool> {
    let tool = tool.as_ref();
    let output = Command::new(tool).args(args).output().await;

    match output {
        Ok(output) => Ok(output.status.success()),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(false),
            std::io::ErrorKind::PermissionDenied => {
                warn!("No permission to run {:?}: {}", tool, e);
                Ok(false)
            }
            _ => Err(AppError::Io(e)),
        },
    }
}

/// Startup dependency checker
pub struct DependencyChecker {
    libraries_dir: PathBuf,
    auto_install: bool,
    require_transcoder: bool,
    transcoder_program: String,
    downloader_program: String,
    python_interpreter: String,
    installer: Box<dyn DownloaderInstaller>,
}

impl DependencyChecker {
    pub fn new(libraries_dir: impl Into<PathBuf>) -> Self {
        Self {
            libraries_dir: libraries_dir.into(),
            auto_install: true,
            require_transcoder: false,
            transcoder_program: "ffmpeg".to_string(),
            downloader_program: "yt-dlp".to_string(),
            python_interpreter: "python3".to_string(),
            installer: Box::new(YtDlpReleaseInstaller),
        }
    }

    pub fn with_auto_install(mut self, enabled: bool) -> Self {
        self.auto_install = enabled;
        self
    }

    pub fn with_require_transcoder(mut self, required: bool) -> Self {
        self.require_transcoder = required;
        self
    }

    pub fn with_installer(mut self, installer: Box<dyn DownloaderInstaller>) -> Self {
        self.installer = installer;
        self
    }

    /// Override the program names that are looked up
    pub fn with_programs(
        mut self,
        transcoder: impl Into<String>,
        downloader: impl Into<String>,
        python: impl Into<String>,
    ) -> Self {
        self.transcoder_program = transcoder.into();
        self.downloader_program = downloader.into();
        self.python_interpreter = python.into();
        self
    }

    /// Verify ffmpeg and make sure a yt-dlp is available, installing it once
    /// if needed.
    pub async fn ensure_dependencies(&self) -> AppResult<DependencyReport> {
        report::print_dependency_header();

        let transcoder = self.locate_transcoder().await?;
        match &transcoder {
            Some(path) => {
                info!("✅ FFmpeg is available: {}", path.display());
                println!("ffmpeg 已安装");
            }
            None if self.require_transcoder => {
                error!("❌ FFmpeg is required but not available");
                report::print_transcoder_warning(false);
                return Err(AppError::TranscoderMissing);
            }
            None => {
                warn!("⚠️ FFmpeg is not available");
                report::print_transcoder_warning(true);
            }
        }

        let downloader = match self.locate_downloader().await? {
            Some(location) => {
                info!("✅ yt-dlp is available: {}", location.describe());
                println!("yt-dlp 已安装");
                location
            }
            None => self.install_downloader().await?,
        };

        Ok(DependencyReport {
            transcoder,
            downloader,
        })
    }

    async fn locate_transcoder(&self) -> AppResult<Option<PathBuf>> {
        let bundled = self
            .libraries_dir
            .join(executable_name(&self.transcoder_program));
        if bundled.is_file() && check_tool_availability(&bundled, &["-version"]).await? {
            return Ok(Some(bundled));
        }

        if check_tool_availability(&self.transcoder_program, &["-version"]).await? {
            return Ok(Some(PathBuf::from(&self.transcoder_program)));
        }

        Ok(None)
    }

    async fn locate_downloader(&self) -> AppResult<Option<DownloaderLocation>> {
        let bundled = self
            .libraries_dir
            .join(executable_name(&self.downloader_program));
        if bundled.is_file() && check_tool_availability(&bundled, &["--version"]).await? {
            debug!("Using bundled yt-dlp at {}", bundled.display());
            return Ok(Some(DownloaderLocation::Binary(bundled)));
        }

        if check_tool_availability(&self.downloader_program, &["--version"]).await? {
            return Ok(Some(DownloaderLocation::Binary(PathBuf::from(
                &self.downloader_program,
            ))));
        }

        if check_tool_availability(&self.python_interpreter, &["-m", "yt_dlp", "--version"])
            .await?
        {
            return Ok(Some(DownloaderLocation::PythonModule {
                interpreter: self.python_interpreter.clone(),
            }));
        }

        Ok(None)
    }

    async fn install_downloader(&self) -> AppResult<DownloaderLocation> {
        if !self.auto_install {
            error!("❌ yt-dlp is not available and auto-install is disabled");
            return Err(AppError::DependencyInstall(
                "yt-dlp 未安装，且已禁用自动安装".to_string(),
            ));
        }

        println!("正在安装 yt-dlp...");
        info!("📦 Installing yt-dlp into {}", self.libraries_dir.display());

        match self.installer.install(&self.libraries_dir).await {
            Ok(path) => {
                println!("yt-dlp 安装成功");
                info!("✅ yt-dlp installed at {}", path.display());
                Ok(DownloaderLocation::Binary(path))
            }
            Err(e) => {
                println!("安装 yt-dlp 失败: {}", e);
                error!("❌ Failed to install yt-dlp: {}", e);
                Err(e)
            }
        }
    }
}
