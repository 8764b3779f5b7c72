//! Domain types: price bars, validated series and content identifiers.

pub mod bar;
pub mod ids;
pub mod series;

pub use bar::PriceBar;
pub use ids::{DatasetHash, RunId};
pub use series::{PriceSeries, DEFAULT_MAX_SERIES_LEN};
