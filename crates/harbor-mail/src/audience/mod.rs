//! Audience sizing over the waterfront homeowner coverage dataset.

mod aggregator;
pub mod coverage;
pub mod router;
mod selection;

pub use aggregator::{AudienceAggregator, AudienceSummary, CountyView};
pub use coverage::{
    CityCountBreakdown, CityCoverage, CountyCoverage, CoverageDataset, CoverageImportError,
    CoverageRecord, CoverageResponse, ZipCount, ZipCountBreakdown, ZipCoverage,
};
pub use router::{audience_router, CoverageState};
pub use selection::{
    parse_list, AudienceSelection, SelectionMode, UnknownWaterwayType, WaterwayType,
};
