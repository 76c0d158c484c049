//! Sequential batch driver

use tracing::info;

use crate::core::extractor::AudioExtractor;
use crate::core::models::{BatchSummary, ExtractionRequest};
use crate::core::report;

/// Extract every request in input order. A failed item never stops the batch.
pub async fn run_batch(extractor: &AudioExtractor, requests: &[ExtractionRequest]) -> BatchSummary {
    report::print_batch_header(requests);

    let total = requests.len();
    let mut summary = BatchSummary::default();

    for (index, request) in requests.iter().enumerate() {
        report::print_batch_item(index + 1, total, &request.url);

        let result = extractor.extract(request).await;
        summary.record(&result);
    }

    info!(
        "📊 Batch finished: {} succeeded, {} failed",
        summary.success_count, summary.failure_count
    );
    report::print_summary(&summary);

    summary
}
