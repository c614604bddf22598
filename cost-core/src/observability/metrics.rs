use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;
use crate::cost::engine::PricingResult;
use crate::error::Result;

#[derive(Clone)]
pub struct EstimateMetrics {
    registry: Arc<Registry>,
    items_priced: Counter,
    informational_items: Counter,
    failed_items: Counter,
    portfolio_total: Gauge,
    item_duration: Histogram,
}

impl EstimateMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let items_priced = Counter::with_opts(
            Opts::new("cost_items_priced_total", "Line items priced successfully")
                .const_label("component", "engine"),
        )?;
        let informational_items = Counter::with_opts(Opts::new(
            "cost_informational_items_total",
            "Line items for unrecognized services priced at zero",
        ))?;
        let failed_items = Counter::with_opts(Opts::new(
            "cost_failed_items_total",
            "Line items that failed to price",
        ))?;
        let portfolio_total = Gauge::with_opts(Opts::new(
            "cost_portfolio_total_usd",
            "Projected portfolio cost over the horizon",
        ))?;
        let item_duration = Histogram::with_opts(
            HistogramOpts::new("cost_item_duration_seconds", "Time to price one line item")
                .buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1]),
        )?;

        registry.register(Box::new(items_priced.clone()))?;
        registry.register(Box::new(informational_items.clone()))?;
        registry.register(Box::new(failed_items.clone()))?;
        registry.register(Box::new(portfolio_total.clone()))?;
        registry.register(Box::new(item_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            items_priced,
            informational_items,
            failed_items,
            portfolio_total,
            item_duration,
        })
    }

    /// `None` marks a failed item.
    pub fn record_item(&self, result: Option<&PricingResult>, elapsed: Duration) {
        self.item_duration.observe(elapsed.as_secs_f64());
        match result {
            Some(result) => {
                self.items_priced.inc();
                if result.informational {
                    self.informational_items.inc();
                }
            }
            None => self.failed_items.inc(),
        }
    }

    pub fn set_portfolio_total(&self, total: f64) {
        self.portfolio_total.set(total);
    }

    pub fn items_priced(&self) -> u64 {
        self.items_priced.get() as u64
    }

    pub fn informational_items(&self) -> u64 {
        self.informational_items.get() as u64
    }

    pub fn failed_items(&self) -> u64 {
        self.failed_items.get() as u64
    }

    /// Prometheus text exposition of every registered metric.
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
