//! URL 列表文件解析模块
//!
//! 读取每行一个URL的文本文件，支持自动编码检测（UTF-8、UTF-16、GBK 等），
//! 去除首尾空白并跳过空行，保持原始顺序。

use chardetng::EncodingDetector as ChardetngDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::models::{AppError, AppResult};
use crate::utils::validation::is_valid_video_url;

/// 解析结果统计信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// 总行数
    pub total_lines: usize,
    /// 跳过的空行数
    pub skipped_lines: usize,
    /// 不是 http(s) 链接但仍会尝试的行数
    pub suspicious_lines: usize,
    /// 检测到的文件编码
    pub detected_encoding: String,
}

/// 编码检测器
///
/// 检测顺序：BOM → 严格 UTF-8 → chardetng（需能无损解码）→ UTF-8（有损）
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingDetector;

impl EncodingDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, data: &[u8]) -> &'static Encoding {
        if data.is_empty() {
            return UTF_8;
        }

        if let Some(encoding) = self.detect_bom(data) {
            debug!("通过BOM检测到编码: {}", encoding.name());
            return encoding;
        }

        if std::str::from_utf8(data).is_ok() {
            return UTF_8;
        }

        if let Some(encoding) = self.chardetng_detect(data) {
            debug!("通过chardetng检测到编码: {}", encoding.name());
            return encoding;
        }

        UTF_8
    }

    fn detect_bom(&self, data: &[u8]) -> Option<&'static Encoding> {
        if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
            Some(UTF_8)
        } else if data.starts_with(&[0xFF, 0xFE]) {
            Some(UTF_16LE)
        } else if data.starts_with(&[0xFE, 0xFF]) {
            Some(UTF_16BE)
        } else {
            None
        }
    }

    fn chardetng_detect(&self, data: &[u8]) -> Option<&'static Encoding> {
        let mut detector = ChardetngDetector::new();
        detector.feed(data, true);
        let guess = detector.guess(None, true);

        let (_, _, has_errors) = guess.decode(data);
        if has_errors {
            None
        } else {
            Some(guess)
        }
    }
}

/// URL 列表解析器
#[derive(Debug, Default)]
pub struct UrlListParser {
    detector: EncodingDetector,
}

impl UrlListParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取并解析 URL 列表文件
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> AppResult<(Vec<String>, ParseStats)> {
        let path = file_path.as_ref();

        if !path.exists() {
            return Err(AppError::InputFileNotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path).map_err(|source| AppError::InputFileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let encoding = self.detector.detect(&data);
        // decode() strips any BOM before decoding
        let (text, _, had_errors) = encoding.decode(&data);
        if had_errors {
            warn!("文件 {} 包含无法解码的字节，已替换", path.display());
        }

        let (urls, mut stats) = Self::parse_text(&text);
        stats.detected_encoding = encoding.name().to_string();

        if urls.is_empty() {
            return Err(AppError::EmptyInputFile(path.to_path_buf()));
        }

        info!(
            "📋 从 {} 读取到 {} 个URL (编码: {}, 跳过空行: {})",
            path.display(),
            urls.len(),
            stats.detected_encoding,
            stats.skipped_lines
        );

        Ok((urls, stats))
    }

    /// 按行拆分文本，去除空白并跳过空行
    pub fn parse_text(text: &str) -> (Vec<String>, ParseStats) {
        let mut stats = ParseStats {
            total_lines: 0,
            skipped_lines: 0,
            suspicious_lines: 0,
            detected_encoding: UTF_8.name().to_string(),
        };
        let mut urls = Vec::new();

        for (index, line) in text.lines().enumerate() {
            stats.total_lines += 1;
            let url = line.trim();

            if url.is_empty() {
                stats.skipped_lines += 1;
                continue;
            }

            if !is_valid_video_url(url) {
                stats.suspicious_lines += 1;
                warn!("第 {} 行不是有效的 http(s) 链接，仍将尝试: {}", index + 1, url);
            }

            urls.push(url.to_string());
        }

        (urls, stats)
    }
}
