//! Console output shown to the user
//!
//! Diagnostics go through `tracing` on stderr; everything here is printed to
//! stdout so it can be read or piped as a plain report.

use std::path::Path;

use crate::core::models::{BatchSummary, ExtractionRequest, ExtractionResult};

const NARROW: usize = 60;
const WIDE: usize = 80;

pub fn rule(ch: char, width: usize) -> String {
    ch.to_string().repeat(width)
}

pub fn print_welcome(version: &str) {
    println!("视频音频提取工具 v{}", version);
    println!("支持从Bilibili、YouTube等网站提取音频");
}

pub fn print_usage_hint() {
    println!("使用 --help 查看帮助信息");
}

pub fn print_dependency_header() {
    println!("\n{}", rule('=', NARROW));
    println!("正在检查并安装依赖库...");
    println!("{}", rule('=', NARROW));
}

pub fn print_transcoder_warning(continuing: bool) {
    println!("\n警告: ffmpeg 未安装");
    println!("ffmpeg 是提取和转换音频所必需的工具");
    println!("请按照以下命令安装ffmpeg:");
    println!("  • macOS: brew install ffmpeg");
    println!("  • Linux: sudo apt-get install ffmpeg");
    println!("  • Windows: choco install ffmpeg");
    if continuing {
        println!("\n继续执行，但音频格式转换可能会失败...");
    }
}

pub fn print_request(request: &ExtractionRequest, backend: &str) {
    println!("\n{}", rule('=', NARROW));
    println!("开始从视频提取音频");
    println!("视频URL: {}", request.url);
    println!("输出目录: {}", request.output_dir.display());
    println!("音频格式: {}", request.audio_format);
    println!("音频质量: {}", request.quality);
    println!("下载方式: {}", backend);
    println!("{}", rule('=', NARROW));
}

pub fn print_extraction_outcome(result: &ExtractionResult, output_dir: &Path) {
    println!("\n{}", rule('=', NARROW));
    match &result.error {
        None => {
            println!("提取音频成功!");
            println!("视频标题: {}", result.title.as_deref().unwrap_or("未知"));
            match &result.file_path {
                Some(path) => println!("输出文件: {}", path.display()),
                None => println!("输出目录: {}", output_dir.display()),
            }
        }
        Some(error) => {
            println!("提取音频失败: {}", error);
        }
    }
    println!("{}", rule('=', NARROW));
}

pub fn print_batch_header(requests: &[ExtractionRequest]) {
    println!("\n{}", rule('=', WIDE));
    println!("开始批量提取音频");
    println!("总视频数: {}", requests.len());
    if let Some(first) = requests.first() {
        println!("输出目录: {}", first.output_dir.display());
        println!("音频格式: {}", first.audio_format);
        println!("音频质量: {}", first.quality);
    }
    println!("{}", rule('=', WIDE));
}

pub fn print_batch_item(index: usize, total: usize, url: &str) {
    println!("\n{}", rule('-', WIDE));
    println!("处理第 {}/{} 个视频", index, total);
    println!("URL: {}", url);
    println!("{}", rule('-', WIDE));
}

pub fn print_summary(summary: &BatchSummary) {
    println!("\n{}", rule('=', WIDE));
    print!("{}", summary.render());
    println!("{}", rule('=', WIDE));
}
