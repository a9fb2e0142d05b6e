//! Country codes present in the boundary file.
//!
//! Geometry is the renderer's business; the core only needs to know which
//! countries the map will draw so it can report those that never appear in
//! the dataset. Both TopoJSON (`objects.<name>.geometries[].id`) and GeoJSON
//! (`features[].id`) layouts are accepted.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;
use wellbeing_model::CountryId;

use crate::error::{IngestError, Result};

/// TopoJSON object preferred when the topology holds several.
pub const COUNTRIES_OBJECT: &str = "countries";

pub fn load_boundary_ids(path: &Path) -> Result<BTreeSet<CountryId>> {
    let contents = std::fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    parse_boundary_ids(&contents, path)
}

/// Parse boundary JSON held in memory. `origin` is only used in error messages.
pub fn parse_boundary_ids(contents: &str, origin: &Path) -> Result<BTreeSet<CountryId>> {
    let root: Value = serde_json::from_str(contents).map_err(|source| IngestError::Json {
        path: origin.to_path_buf(),
        source,
    })?;
    let shapes = shape_list(&root).ok_or_else(|| IngestError::NoGeometries {
        path: origin.to_path_buf(),
    })?;

    let mut ids = BTreeSet::new();
    for shape in shapes {
        match shape.get("id").and_then(id_from_value) {
            Some(id) => {
                ids.insert(id);
            }
            None => {
                tracing::debug!(id = ?shape.get("id"), "skipping boundary without a country code");
            }
        }
    }
    tracing::debug!(count = ids.len(), path = %origin.display(), "loaded boundary ids");
    Ok(ids)
}

fn shape_list(root: &Value) -> Option<&Vec<Value>> {
    if let Some(objects) = root.get("objects").and_then(Value::as_object) {
        let object = objects
            .get(COUNTRIES_OBJECT)
            .or_else(|| objects.values().next())?;
        return object.get("geometries").and_then(Value::as_array);
    }
    root.get("features").and_then(Value::as_array)
}

fn id_from_value(value: &Value) -> Option<CountryId> {
    match value {
        Value::String(text) => text.parse().ok(),
        Value::Number(number) => number
            .as_u64()
            .and_then(|code| u32::try_from(code).ok())
            .and_then(|code| CountryId::new(code).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_topojson_geometries() {
        let json = r#"{
            "type": "Topology",
            "objects": {
                "land": {"geometries": []},
                "countries": {"geometries": [
                    {"type": "Polygon", "id": "752"},
                    {"type": "Polygon", "id": "-99"},
                    {"type": "Polygon", "id": 4}
                ]}
            }
        }"#;
        let ids = parse_boundary_ids(json, Path::new("world.json")).unwrap();
        let codes: Vec<u32> = ids.iter().map(|id| id.get()).collect();
        assert_eq!(codes, vec![4, 752]);
    }

    #[test]
    fn reads_geojson_features() {
        let json = r#"{"type": "FeatureCollection", "features": [{"id": "036"}, {"properties": {}}]}"#;
        let ids = parse_boundary_ids(json, Path::new("world.geojson")).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&CountryId::new(36).unwrap()));
    }

    #[test]
    fn rejects_json_without_shapes() {
        let err = parse_boundary_ids("{}", Path::new("empty.json")).unwrap_err();
        assert!(matches!(err, IngestError::NoGeometries { .. }));
    }
}
