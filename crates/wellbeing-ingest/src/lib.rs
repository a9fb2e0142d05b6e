pub mod boundaries;
pub mod csv_table;
pub mod error;
pub mod records;
pub mod regions;
pub mod sources;

pub use boundaries::{load_boundary_ids, parse_boundary_ids};
pub use csv_table::{CsvTable, parse_csv_str, read_csv_table};
pub use error::{IngestError, Result};
pub use records::{COUNTRY_ID_COLUMN, COUNTRY_NAME_COLUMN, YEAR_COLUMN, parse_records};
pub use regions::{REGION_ID_COLUMNS, REGION_NAME_COLUMN, parse_regions};
pub use sources::{LoadedSources, SourcePaths, load_sources};
