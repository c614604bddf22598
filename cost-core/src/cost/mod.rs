pub mod batch;
pub mod calculator;
pub mod engine;
pub mod portfolio;
pub mod pricing;
pub mod services;
pub mod source;
pub mod timeline;

pub use batch::price_concurrently;
pub use calculator::{BasePriceCalculator, HOURS_PER_MONTH};
pub use engine::{
    CommitmentType, LineItem, PricingEngine, PricingResult, TimelineSettings, UsagePattern,
};
pub use portfolio::{ItemShare, PortfolioAggregator, PortfolioSummary};
pub use pricing::{PriceLookup, PriceTable};
pub use services::{ConfigValue, ServiceConfiguration, ServiceIdentifier, ServiceKind, ServiceSpec};
pub use source::{FilePriceSource, PriceSource, StaticPriceSource};
pub use timeline::{MonthlyPoint, TimelineProjector, TimelineSeries, YearlyAggregate};
