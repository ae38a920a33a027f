pub mod crossing;
pub mod normalize;
pub mod projection;
pub mod regression;
pub mod report;
pub mod runalyze;
pub mod source;
pub mod time_series;


pub use crossing::find_crossing;
pub use normalize::normalize;
pub use projection::{project, recommend, ProjectionOutcome, DEFAULT_WINDOWS, READINESS_TARGET};
pub use regression::{fit_line, LinearFit};
pub use report::{AthleteReport, ShapeReport};
pub use runalyze::{AthleteDocuments, FetchConfig, FetchError, HistoryClient};
pub use source::{DirectorySource, DocumentSource, InMemorySource};
pub use time_series::{day_start_utc, PercentSample, ShapeSeries};
