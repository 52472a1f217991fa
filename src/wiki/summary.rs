use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::toc::resolve_month_sections;
use super::{Month, WikiSource};
use crate::cleaner::{extract_month_events, CleanOptions};
use crate::error::{Result, WikiError};

/// Month → cleaned events in document order. Months with no events are absent.
pub type YearSummary = BTreeMap<Month, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub per_month_limit: usize,
    pub max_concurrent_fetches: usize,
    pub clean: CleanOptions,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            per_month_limit: 6,
            max_concurrent_fetches: 4,
            clean: CleanOptions {
                max_len: 200,
                keep_date_prefix: false,
            },
        }
    }
}

/// Resolve the year's month sections, then fetch and clean them concurrently.
///
/// At most `max_concurrent_fetches` section fetches are in flight at once. The
/// first failing fetch aborts the rest and its error is returned; no partial
/// summary is ever produced.
pub async fn build_summary(
    source: Arc<dyn WikiSource>,
    year: i32,
    opts: SummaryOptions,
) -> Result<YearSummary> {
    let start = Instant::now();
    let months = resolve_month_sections(source.as_ref(), year).await?;

    // Fresh gate per call, shared by this call's month tasks only
    let gate = Arc::new(Semaphore::new(opts.max_concurrent_fetches.max(1)));
    let mut tasks = JoinSet::new();

    for (month, index) in months {
        let source = Arc::clone(&source);
        let gate = Arc::clone(&gate);

        tasks.spawn(async move {
            let wikitext = {
                let _permit = gate.acquire().await.expect("fetch gate is never closed");
                source.section_text(year, &index).await?
            };
            let events = extract_month_events(&wikitext, opts.per_month_limit, opts.clean);
            debug!("{} {}: {} events from section {}", month, year, events.len(), index);
            Ok::<_, WikiError>((month, events))
        });
    }

    let mut summary = YearSummary::new();
    while let Some(joined) = tasks.join_next().await {
        // Returning early drops `tasks`, which aborts the fetches still running
        let (month, events) = joined??;
        if !events.is_empty() {
            summary.insert(month, events);
        }
    }

    info!(
        "Year {} summary built in {:.2}s: {} months, {} events",
        year,
        start.elapsed().as_secs_f32(),
        summary.len(),
        summary.values().map(Vec::len).sum::<usize>()
    );
    Ok(summary)
}

// ── Tests ──
