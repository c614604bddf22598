use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// 1-based period index
    pub month: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyAggregate {
    /// 1-based year index
    pub year: u32,
    /// Months summed into this year; below 12 only for a trailing partial year.
    pub months: u32,
    pub cost: f64,
}

/// Monthly cost series with its yearly sums and running total.
///
/// `cumulative[i]` is the sum of `monthly[0..=i]` accumulated left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSeries {
    pub monthly: Vec<MonthlyPoint>,
    pub yearly: Vec<YearlyAggregate>,
    pub cumulative: Vec<f64>,
}

impl TimelineSeries {
    /// Build a series from per-month costs in period order.
    pub fn from_costs(costs: Vec<f64>) -> Self {
        let monthly: Vec<MonthlyPoint> = costs
            .iter()
            .enumerate()
            .map(|(i, cost)| MonthlyPoint {
                month: i as u32 + 1,
                cost: *cost,
            })
            .collect();

        let mut cumulative = Vec::with_capacity(costs.len());
        let mut running = 0.0;
        for cost in &costs {
            running += cost;
            cumulative.push(running);
        }

        let yearly = costs
            .chunks(MONTHS_PER_YEAR)
            .enumerate()
            .map(|(i, block)| YearlyAggregate {
                year: i as u32 + 1,
                months: block.len() as u32,
                cost: block.iter().sum(),
            })
            .collect();

        Self {
            monthly,
            yearly,
            cumulative,
        }
    }

    pub fn len(&self) -> usize {
        self.monthly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.monthly.iter().map(|p| p.cost).collect()
    }

    pub fn years(&self) -> usize {
        self.yearly.len()
    }

    /// Total over the horizon; zero for an empty series.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineProjector;

impl TimelineProjector {
    pub fn new() -> Self {
        Self
    }

    /// Project `monthly_cost` over `months` periods with monthly compounding.
    ///
    /// Period `m` costs `monthly_cost * (1 + growth_rate)^(m - 1)`, so the
    /// first period is unmodified. Rates too small to change `1.0 + growth_rate`
    /// (below about 1.1e-16) compound to a flat series; `TimelineSettings`
    /// rejects them.
    pub fn project(&self, monthly_cost: f64, months: u32, growth_rate: f64) -> TimelineSeries {
        let factor = 1.0 + growth_rate;
        let costs = (0..months)
            .map(|m| monthly_cost * factor.powi(m as i32))
            .collect();
        TimelineSeries::from_costs(costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zero_growth_is_constant() {
        let series = TimelineProjector::new().project(100.0, 12, 0.0);
        assert_eq!(series.len(), 12);
        assert!(series.monthly.iter().all(|p| p.cost == 100.0));
        for (i, total) in series.cumulative.iter().enumerate() {
            assert!(approx(*total, (i as f64 + 1.0) * 100.0));
        }
        assert!(approx(series.total(), 1200.0));
    }

    #[test]
    fn test_compounding() {
        let series = TimelineProjector::new().project(100.0, 3, 0.05);
        let costs = series.costs();
        assert!(approx(costs[0], 100.0));
        assert!(approx(costs[1], 105.0));
        assert!(approx(costs[2], 110.25));
        assert!(approx(series.cumulative[1], 205.0));
        assert!(approx(series.cumulative[2], 315.25));
        assert_eq!(series.monthly[0].month, 1);
        assert_eq!(series.monthly[2].month, 3);
    }

    #[test]
    fn test_positive_growth_strictly_increases() {
        let series = TimelineProjector::new().project(42.0, 60, 0.01);
        for pair in series.monthly.windows(2) {
            assert!(pair[1].cost > pair[0].cost);
        }
    }

    #[test]
    fn test_yearly_blocks() {
        let series = TimelineProjector::new().project(10.0, 24, 0.02);
        assert_eq!(series.years(), 2);
        let costs = series.costs();
        let first: f64 = costs[..12].iter().sum();
        let second: f64 = costs[12..].iter().sum();
        assert!(approx(series.yearly[0].cost, first));
        assert!(approx(series.yearly[1].cost, second));
        assert_eq!(series.yearly[1].year, 2);
    }

    #[test]
    fn test_partial_trailing_year() {
        let series = TimelineProjector::new().project(10.0, 15, 0.0);
        assert_eq!(series.years(), 2);
        assert_eq!(series.yearly[0].months, 12);
        assert_eq!(series.yearly[1].months, 3);
        assert!(approx(series.yearly[1].cost, 30.0));
    }

    #[test]
    fn test_empty_horizon() {
        let series = TimelineProjector::new().project(100.0, 0, 0.05);
        assert!(series.is_empty());
        assert!(series.yearly.is_empty());
        assert_eq!(series.total(), 0.0);
    }

    #[test]
    fn test_reconciliation() {
        let series = TimelineProjector::new().project(123.45, 37, 0.033);
        let sum: f64 = series.costs().iter().sum();
        assert!((sum - series.total()).abs() < 1e-6);
        let yearly_sum: f64 = series.yearly.iter().map(|y| y.cost).sum();
        assert!((yearly_sum - series.total()).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let projector = TimelineProjector::new();
        assert_eq!(projector.project(99.9, 48, 0.017), projector.project(99.9, 48, 0.017));
    }
}
