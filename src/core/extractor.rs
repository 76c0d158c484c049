//! Single-item audio extraction
//!
//! Every failure on the way is turned into a failed [`ExtractionResult`];
//! nothing here returns an error to the caller.

use tracing::{debug, error, info};

use crate::core::models::{ExtractionError, ExtractionRequest, ExtractionResult};
use crate::core::report;
use crate::downloaders::DownloadBackend;
use crate::utils::file_utils::ensure_dir_exists;

pub struct AudioExtractor {
    backend: Box<dyn DownloadBackend>,
}

impl AudioExtractor {
    pub fn new(backend: Box<dyn DownloadBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extract the audio track of one URL
    pub async fn extract(&self, request: &ExtractionRequest) -> ExtractionResult {
        report::print_request(request, self.backend.name());

        let result = match self.try_extract(request).await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ Extraction failed for {}: {}", request.url, e);
                ExtractionResult::failed(request.url.clone(), e)
            }
        };

        report::print_extraction_outcome(&result, &request.output_dir);
        result
    }

    async fn try_extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractionError> {
        ensure_dir_exists(&request.output_dir).map_err(|source| {
            ExtractionError::OutputDirectory {
                path: request.output_dir.clone(),
                source,
            }
        })?;
        debug!("Output directory ready: {}", request.output_dir.display());

        let audio = self.backend.download_audio(request).await?;
        info!(
            "✅ Extracted audio from {} ({})",
            request.url,
            audio.title.as_deref().unwrap_or("unknown title")
        );

        Ok(ExtractionResult::succeeded(request.url.clone(), audio))
    }
}
