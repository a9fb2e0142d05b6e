pub mod error;
pub mod ids;
pub mod metric;
pub mod record;
pub mod region;

pub use error::{ModelError, Result};
pub use ids::{CountryId, Year};
pub use metric::{Metric, MetricMap, RankDirection};
pub use record::Record;
pub use region::RegionRow;
