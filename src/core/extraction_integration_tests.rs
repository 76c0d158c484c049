//! End-to-end extraction tests with scripted backends

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

use crate::core::batch::run_batch;
use crate::core::extractor::AudioExtractor;
use crate::core::file_parser::UrlListParser;
use crate::core::models::{
    AppError, BatchSummary, DownloadedAudio, ExtractionError, ExtractionRequest,
};
use crate::downloaders::DownloadBackend;

/// Succeeds for every URL except the ones listed in `failing`
struct ScriptedBackend {
    failing: HashSet<String>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    fn new(failing: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let backend = Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            seen: seen.clone(),
        };
        (backend, seen)
    }
}

#[async_trait]
impl DownloadBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn download_audio(
        &self,
        request: &ExtractionRequest,
    ) -> Result<DownloadedAudio, ExtractionError> {
        self.seen.lock().unwrap().push(request.url.clone());

        if self.failing.contains(&request.url) {
            return Err(ExtractionError::Process {
                exit_code: Some(1),
                stderr: "ERROR: Unsupported URL".to_string(),
            });
        }

        let title = format!("Title of {}", request.url.rsplit('/').next().unwrap_or(""));
        let file_path = request.output_dir.join(format!("{}.{}", title, request.audio_format));
        std::fs::write(&file_path, b"audio").unwrap();

        Ok(DownloadedAudio {
            title: Some(title),
            file_path: Some(file_path),
        })
    }
}

fn requests(urls: &[&str], output_dir: &std::path::Path) -> Vec<ExtractionRequest> {
    urls.iter()
        .map(|url| ExtractionRequest::new(*url, output_dir, "mp3", "128k"))
        .collect()
}

#[tokio::test]
async fn test_single_extraction_success() {
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("audio");
    let (backend, _) = ScriptedBackend::new(&[]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let request = ExtractionRequest::new("https://example.com/v1", &output_dir, "mp3", "128k");
    let result = extractor.extract(&request).await;

    assert!(result.success());
    assert_eq!(extractor.backend_name(), "scripted");
    assert_eq!(result.title.as_deref(), Some("Title of v1"));
    assert!(output_dir.is_dir());
    assert!(result.file_path.unwrap().is_file());
}

#[tokio::test]
async fn test_existing_output_dir_is_reused() {
    let dir = tempdir().unwrap();
    let (backend, _) = ScriptedBackend::new(&[]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let request = ExtractionRequest::new("https://example.com/v1", dir.path(), "mp3", "128k");
    assert!(extractor.extract(&request).await.success());
    assert!(extractor.extract(&request).await.success());
}

#[tokio::test]
async fn test_backend_failure_becomes_failed_result() {
    let dir = tempdir().unwrap();
    let (backend, _) = ScriptedBackend::new(&["https://example.com/bad"]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let request = ExtractionRequest::new("https://example.com/bad", dir.path(), "mp3", "128k");
    let result = extractor.extract(&request).await;

    assert!(!result.success());
    assert!(result.title.is_none());
    let message = result.error_message().unwrap();
    assert!(message.contains("Unsupported URL"));
}

#[tokio::test]
async fn test_uncreatable_output_dir_fails_without_download() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let (backend, seen) = ScriptedBackend::new(&[]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let request = ExtractionRequest::new(
        "https://example.com/v1",
        blocker.join("audio"),
        "mp3",
        "128k",
    );
    let result = extractor.extract(&request).await;

    assert!(!result.success());
    assert!(matches!(
        result.error,
        Some(ExtractionError::OutputDirectory { .. })
    ));
    assert!(!result.error_message().unwrap().is_empty());
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_batch() {
    let (backend, _) = ScriptedBackend::new(&[]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let summary = run_batch(&extractor, &[]).await;
    assert_eq!(summary, BatchSummary::default());
    assert_eq!(summary.total(), 0);
}

#[tokio::test]
async fn test_batch_counts_and_order() {
    let dir = tempdir().unwrap();
    let urls = [
        "https://example.com/a",
        "https://example.com/b",
        "https://example.com/c",
        "https://example.com/d",
        "https://example.com/e",
    ];
    let (backend, seen) = ScriptedBackend::new(&["https://example.com/b", "https://example.com/e"]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let summary = run_batch(&extractor, &requests(&urls, dir.path())).await;

    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.failure_count, 2);
    assert_eq!(summary.total(), urls.len());
    assert_eq!(
        summary.failed_urls,
        vec!["https://example.com/b", "https://example.com/e"]
    );
    // every item is attempted, in input order, even after a failure
    assert_eq!(*seen.lock().unwrap(), urls.to_vec());
}

#[tokio::test]
async fn test_url_file_batch_report() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("urls.txt");
    std::fs::write(
        &list,
        "https://example.com/one\n\nhttps://example.com/broken\n  https://example.com/three\n",
    )
    .unwrap();

    let (urls, stats) = UrlListParser::new().parse(&list).unwrap();
    assert_eq!(urls.len(), 3);
    assert_eq!(stats.skipped_lines, 1);

    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let (backend, _) = ScriptedBackend::new(&["https://example.com/broken"]);
    let extractor = AudioExtractor::new(Box::new(backend));

    let summary = run_batch(&extractor, &requests(&url_refs, &dir.path().join("audio"))).await;
    let rendered = summary.render();

    assert!(rendered.contains("成功: 2 个"));
    assert!(rendered.contains("失败: 1 个"));
    assert!(rendered.contains("  - https://example.com/broken"));
}

#[tokio::test]
async fn test_missing_url_file() {
    let dir = tempdir().unwrap();
    let missing: PathBuf = dir.path().join("nope.txt");

    let err = UrlListParser::new().parse(&missing).unwrap_err();
    assert!(matches!(err, AppError::InputFileNotFound(ref p) if *p == missing));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_blank_url_file() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("blank.txt");
    std::fs::write(&list, "\n   \n\t\n").unwrap();

    let err = UrlListParser::new().parse(&list).unwrap_err();
    assert!(matches!(err, AppError::EmptyInputFile(_)));
}
