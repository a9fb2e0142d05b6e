use std::collections::BTreeMap;

use wellbeing_model::{CountryId, Metric, MetricMap, ModelError, RegionRow};

#[test]
fn metric_deserializes_from_header_or_label() {
    let metric: Metric = serde_json::from_str("\"Perceptions of corruption\"").unwrap();
    assert_eq!(metric, Metric::PerceptionsOfCorruption);

    let metric: Metric = serde_json::from_str("\"gdp per capita\"").unwrap();
    assert_eq!(metric, Metric::LogGdpPerCapita);

    assert!(serde_json::from_str::<Metric>("\"Life Ladder\"").is_err());
}

#[test]
fn unknown_metric_error_names_input() {
    let err = "Wealth".parse::<Metric>().unwrap_err();
    assert_eq!(err, ModelError::UnknownMetric("Wealth".to_string()));
    assert_eq!(err.to_string(), "unknown metric: Wealth");
}

#[test]
fn metric_map_index_mut_updates_single_slot() {
    let mut map: MetricMap<f64> = MetricMap::default();
    map[Metric::Freedom] = 0.8;
    let non_zero: Vec<Metric> = map
        .iter()
        .filter(|(_, value)| **value != 0.0)
        .map(|(metric, _)| metric)
        .collect();
    assert_eq!(non_zero, vec![Metric::Freedom]);
}

#[test]
fn region_row_looks_up_classifications() {
    let mut classifications = BTreeMap::new();
    classifications.insert("region".to_string(), "Europe".to_string());
    classifications.insert("sub-region".to_string(), "Northern Europe".to_string());
    let row = RegionRow {
        country_id: CountryId::new(752).unwrap(),
        name: "Sweden".to_string(),
        classifications,
    };
    assert_eq!(row.classification("region"), Some("Europe"));
    assert_eq!(row.classification("intermediate-region"), None);
}

#[test]
fn country_ids_order_numerically() {
    let mut ids: Vec<CountryId> = ["840", "004", "36"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    ids.sort();
    let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["004", "036", "840"]);
}
