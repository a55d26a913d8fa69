// Run state and the extract -> validate -> dedup -> summarize sequence.
use tracing::debug;

use crate::analyzer;
use crate::extractor::ListingExtractor;
use crate::model::{ListingFragment, PropertyRecord, RunStats, SummaryReport};
use crate::validator::Validator;

/// Explicit run context threaded through the page loop: the growing
/// accepted-record collection plus the counters for the end-of-run report.
/// Nothing here is global; the caller owns it for exactly one run.
pub struct PipelineContext {
    extractor: ListingExtractor,
    validator: Validator,
    accepted: Vec<PropertyRecord>,
    stats: RunStats,
}

pub struct PipelineOutput {
    pub records: Vec<PropertyRecord>,
    pub summary: SummaryReport,
    pub stats: RunStats,
}

impl PipelineContext {
    pub fn new(extractor: ListingExtractor, validator: Validator) -> Self {
        Self {
            extractor,
            validator,
            accepted: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Runs one page's fragments through extraction and validation, in
    /// fragment order. Accepted records are appended in page-then-fragment
    /// order, which dedup relies on for first-occurrence-wins.
    pub fn process_page(&mut self, fragments: &[ListingFragment]) {
        self.stats.pages_fetched += 1;
        self.stats.fragments_found += fragments.len();

        for fragment in fragments {
            let candidate = self.extractor.extract(fragment);
            self.stats.candidates_extracted += 1;

            match self.validator.validate(&candidate) {
                Ok(()) => {
                    self.accepted.push(candidate);
                    self.stats.accepted += 1;
                }
                Err(reason) => {
                    debug!(?reason, raw = %candidate.raw_text, "candidate rejected");
                    self.stats.rejected += 1;
                }
            }
        }
    }

    /// Deduplicates across all pages and computes the summary. Consumes the
    /// context; accepted records are immutable from here on.
    pub fn finish(mut self) -> PipelineOutput {
        let (records, removed) = analyzer::dedup_records(self.accepted);
        self.stats.duplicates_removed = removed;
        let summary = analyzer::summarize(&records);

        PipelineOutput { records, summary, stats: self.stats }
    }
}
