//! ffmpeg audio post-processing
//!
//! Turns a downloaded audio stream into the requested codec and quality, the
//! same job yt-dlp's `-x` post-processor does for the process backend.

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::core::models::ExtractionError;

/// ffmpeg encoder and file extension for a target audio format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTarget {
    pub codec: &'static str,
    pub extension: &'static str,
}

impl AudioTarget {
    pub fn for_format(format: &str) -> Option<Self> {
        let (codec, extension) = match format {
            "mp3" => ("libmp3lame", "mp3"),
            "aac" | "m4a" => ("aac", "m4a"),
            "opus" => ("libopus", "opus"),
            "vorbis" => ("libvorbis", "ogg"),
            "flac" => ("flac", "flac"),
            "wav" => ("pcm_s16le", "wav"),
            "alac" => ("alac", "m4a"),
            // keep the source codec; Matroska audio holds any of them
            "best" => ("copy", "mka"),
            _ => return None,
        };
        Some(Self { codec, extension })
    }

    fn is_lossless(&self) -> bool {
        matches!(self.codec, "copy" | "flac" | "pcm_s16le" | "alac")
    }
}

/// ffmpeg quality arguments for a yt-dlp style quality token.
///
/// `0` (best) to `10` (worst) is a VBR level mapped onto the encoder's own
/// scale, anything else a bitrate (`128k`, `320K`, `192`).
pub fn quality_args(target: &AudioTarget, quality: &str) -> Vec<String> {
    if target.is_lossless() {
        return Vec::new();
    }

    let quality = quality.trim();
    if let Some(kbps) = quality
        .strip_suffix('k')
        .or_else(|| quality.strip_suffix('K'))
    {
        return bitrate_args(kbps);
    }

    match quality.parse::<u32>() {
        Ok(level) if level <= 10 => vbr_args(target, level),
        Ok(kbps) => bitrate_args(&kbps.to_string()),
        Err(_) => Vec::new(),
    }
}

fn bitrate_args(kbps: &str) -> Vec<String> {
    vec!["-b:a".to_string(), format!("{}k", kbps)]
}

fn vbr_args(target: &AudioTarget, level: u32) -> Vec<String> {
    match target.codec {
        // LAME: 0 best, 9 worst
        "libmp3lame" => vec!["-q:a".to_string(), level.min(9).to_string()],
        // Vorbis: 10 best, 0 worst
        "libvorbis" => vec!["-q:a".to_string(), (10 - level).to_string()],
        // libopus and the native aac encoder have no usable -q:a scale;
        // spread the levels between 256k and 64k instead
        _ => bitrate_args(&(256 - level * 192 / 10).to_string()),
    }
}

/// Thin wrapper around an ffmpeg executable
#[derive(Debug, Clone)]
pub struct Transcoder {
    program: PathBuf,
}

impl Transcoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn build_args(
        input: &Path,
        output: &Path,
        target: &AudioTarget,
        quality: &str,
    ) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-vn".to_string(),
            "-c:a".to_string(),
            target.codec.to_string(),
        ];
        args.extend(quality_args(target, quality));
        args.push(output.to_string_lossy().into_owned());
        args
    }

    /// Convert `input` into `output`
    pub async fn convert(
        &self,
        input: &Path,
        output: &Path,
        target: &AudioTarget,
        quality: &str,
    ) -> Result<(), ExtractionError> {
        let args = Self::build_args(input, output, target, quality);
        debug!("ffmpeg {}", args.join(" "));

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| ExtractionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ExtractionError::Transcode(stderr.trim().to_string()));
        }

        Ok(())
    }
}
