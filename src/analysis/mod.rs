mod selector;
mod exponential;
mod logistic;
mod evolution;
mod mortality;
mod report;

pub use selector::{select, selection_label};
pub use exponential::{fit_exponential, threshold_index, ExponentialFit, RateInterval, CASE_THRESHOLD};
pub use logistic::{fit_logistic, LogisticFit};
pub use evolution::{evolution, EvolutionMetrics};
pub use mortality::{death_rate_bounds, DeathRateBounds};
pub use report::{
    AggregateDeathRate, CaseDataset, CaseSummary, RegionAnalyzer, RegionQuery, RegionReport,
};
