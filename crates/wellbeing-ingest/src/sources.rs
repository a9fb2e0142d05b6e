use std::collections::BTreeSet;
use std::path::PathBuf;
use std::thread;

use wellbeing_model::{CountryId, Record, RegionRow};

use crate::boundaries::load_boundary_ids;
use crate::csv_table::read_csv_table;
use crate::error::Result;
use crate::records::parse_records;
use crate::regions::parse_regions;

/// Locations of the three startup sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub data: PathBuf,
    pub regions: PathBuf,
    /// Optional: without it the map knows only the countries in the data.
    pub boundaries: Option<PathBuf>,
}

/// Everything the dashboard needs before any view is built.
#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    pub records: Vec<Record>,
    pub regions: Vec<RegionRow>,
    pub boundary_ids: BTreeSet<CountryId>,
}

/// Load the data table, region table and boundary file concurrently.
///
/// All three loads run to completion; the first error in source order
/// (data, regions, boundaries) is returned and nothing is partially built.
pub fn load_sources(paths: &SourcePaths) -> Result<LoadedSources> {
    let (records, regions, boundary_ids) = thread::scope(|scope| {
        let records = scope.spawn(|| read_csv_table(&paths.data).and_then(|t| parse_records(&t)));
        let regions =
            scope.spawn(|| read_csv_table(&paths.regions).and_then(|t| parse_regions(&t)));
        let boundaries = scope.spawn(|| match &paths.boundaries {
            Some(path) => load_boundary_ids(path),
            None => Ok(BTreeSet::new()),
        });
        (join(records), join(regions), join(boundaries))
    });
    let sources = LoadedSources {
        records: records?,
        regions: regions?,
        boundary_ids: boundary_ids?,
    };
    tracing::info!(
        records = sources.records.len(),
        regions = sources.regions.len(),
        boundaries = sources.boundary_ids.len(),
        "loaded sources"
    );
    Ok(sources)
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
