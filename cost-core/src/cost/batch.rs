use std::sync::Arc;
use std::time::Instant;
use super::engine::{LineItem, PricingEngine, PricingResult, TimelineSettings};
use crate::error::{CostError, Result};
use crate::log_item;
use crate::observability::EstimateMetrics;

/// Price line items on the blocking pool, one task per item.
///
/// Results come back in input order. Settings are validated before any task
/// is spawned. Every task is awaited and recorded in `metrics` even after a
/// failure; the first failing item (in input order) is then returned.
pub async fn price_concurrently(
    engine: Arc<PricingEngine>,
    items: Vec<LineItem>,
    settings: TimelineSettings,
    metrics: Option<EstimateMetrics>,
) -> Result<Vec<PricingResult>> {
    settings.validate()?;

    let handles: Vec<_> = items
        .into_iter()
        .map(|item| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || {
                let started = Instant::now();
                let outcome = engine.price_line_item(&item, &settings);
                (item.name, outcome, started.elapsed())
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    let mut first_error: Option<CostError> = None;
    for handle in handles {
        let (name, outcome, elapsed) = match handle.await {
            Ok(joined) => joined,
            Err(e) => {
                first_error.get_or_insert(e.into());
                continue;
            }
        };
        if let Some(metrics) = &metrics {
            metrics.record_item(outcome.as_ref().ok(), elapsed);
        }
        match outcome {
            Ok(result) => {
                log_item!(
                    debug,
                    name.as_str(),
                    total = result.total_timeline_cost,
                    "Line item priced"
                );
                results.push(result);
            }
            Err(e) => {
                log_item!(debug, name.as_str(), error = %e, "Line item failed");
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(results),
    }
}
