pub mod analysis_service;
pub mod cache;
pub mod fixture_source;
pub mod live_source;
pub mod market_data;

pub use analysis_service::{AnalysisError, AnalysisService};
pub use cache::LookupCache;
pub use fixture_source::FixtureSource;
pub use live_source::LiveSource;
pub use market_data::{MarketDataSource, SourceError};
