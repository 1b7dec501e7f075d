mod region;
mod series;
pub(crate) mod nan_as_null;

pub use region::RegionRecord;
pub use series::{AggregateSeries, CaseTable, Totals, FOCUS_COUNTRY};
