use std::collections::BTreeMap;

use wellbeing_model::{CountryId, RegionRow};

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};

/// Accepted headers for the country code, in lookup order.
pub const REGION_ID_COLUMNS: [&str; 2] = ["country-code", "id"];
pub const REGION_NAME_COLUMN: &str = "name";

const TABLE: &str = "regions";

/// Coerce the region classification table.
///
/// Every column other than the code and the display name becomes a
/// classification column. Empty classification cells are left out of the
/// row's map so that the country matches no value of that column.
pub fn parse_regions(table: &CsvTable) -> Result<Vec<RegionRow>> {
    let id_idx = REGION_ID_COLUMNS
        .iter()
        .find_map(|column| table.column_index(column))
        .ok_or_else(|| IngestError::MissingColumn {
            table: TABLE,
            column: REGION_ID_COLUMNS[0].to_string(),
        })?;
    let name_idx =
        table
            .column_index(REGION_NAME_COLUMN)
            .ok_or_else(|| IngestError::MissingColumn {
                table: TABLE,
                column: REGION_NAME_COLUMN.to_string(),
            })?;
    let classification_columns: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| *idx != id_idx && *idx != name_idx && !header.is_empty())
        .map(|(idx, header)| (idx, header.as_str()))
        .collect();

    let mut rows = Vec::with_capacity(table.rows.len());
    for (idx, cells) in table.rows.iter().enumerate() {
        let country_id: CountryId =
            cells[id_idx]
                .parse()
                .map_err(|source| IngestError::InvalidCountryId {
                    table: TABLE,
                    row: idx + 1,
                    source,
                })?;
        let classifications: BTreeMap<String, String> = classification_columns
            .iter()
            .filter(|(col, _)| !cells[*col].is_empty())
            .map(|(col, header)| ((*header).to_string(), cells[*col].clone()))
            .collect();
        rows.push(RegionRow {
            country_id,
            name: cells[name_idx].clone(),
            classifications,
        });
    }
    tracing::debug!(
        rows = rows.len(),
        columns = classification_columns.len(),
        "parsed region table"
    );
    Ok(rows)
}
