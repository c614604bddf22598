pub mod config;
pub mod cost;
pub mod error;
pub mod observability;
pub mod report;
pub mod validation;

pub use config::EstimateConfig;
pub use cost::{
    LineItem, PortfolioAggregator, PortfolioSummary, PriceLookup, PriceTable, PricingEngine,
    PricingResult, TimelineProjector, TimelineSeries, TimelineSettings,
};
pub use error::{CostError, Result};
pub use report::EstimateReport;
