//! Typed interaction events emitted by renderers and input widgets.

use serde::{Deserialize, Serialize};
use wellbeing_model::{CountryId, Metric, Year};

use crate::error::SelectionError;
use crate::registry::RefreshReport;
use crate::selection::{BrushRect, Projection};

/// Which map received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    /// Comparison map: toggles the country in a comparison slot.
    Map,
    /// "Pick my country" map: sets the primary country.
    Selector,
}

/// One user interaction, as serialized in event streams:
///
/// ```json
/// {"event": "click", "target": "map", "country": 752}
/// {"event": "set_region", "classification": "region", "value": "Europe"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    SetYear {
        year: Year,
    },
    Click {
        target: ClickTarget,
        country: CountryId,
    },
    /// Direct primary selection; `null` clears it.
    SetPrimary {
        country: Option<CountryId>,
    },
    /// An empty value clears the region filter.
    SetRegion {
        classification: String,
        value: String,
    },
    SetMetric {
        metric: Metric,
    },
    /// Confidence as a percentage, e.g. `95`.
    SetConfidence {
        percent: f64,
    },
    /// `null` returns to the per-metric default bin widths.
    SetBins {
        count: Option<usize>,
    },
    SetProjection {
        projection: Projection,
    },
    BrushStart,
    BrushMove {
        rect: BrushRect,
    },
    BrushEnd,
}

impl InteractionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionEvent::SetYear { .. } => "set_year",
            InteractionEvent::Click { .. } => "click",
            InteractionEvent::SetPrimary { .. } => "set_primary",
            InteractionEvent::SetRegion { .. } => "set_region",
            InteractionEvent::SetMetric { .. } => "set_metric",
            InteractionEvent::SetConfidence { .. } => "set_confidence",
            InteractionEvent::SetBins { .. } => "set_bins",
            InteractionEvent::SetProjection { .. } => "set_projection",
            InteractionEvent::BrushStart => "brush_start",
            InteractionEvent::BrushMove { .. } => "brush_move",
            InteractionEvent::BrushEnd => "brush_end",
        }
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The state changed and every view was refreshed once.
    Refreshed(RefreshReport),
    /// Accepted, but nothing changed; no refresh ran.
    Unchanged,
    /// Rejected by a mutator; the state is as before.
    Rejected(SelectionError),
}

impl DispatchOutcome {
    pub fn refreshed(&self) -> bool {
        matches!(self, DispatchOutcome::Refreshed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_lines() {
        let event: InteractionEvent =
            serde_json::from_str(r#"{"event":"click","target":"selector","country":4}"#).unwrap();
        assert_eq!(
            event,
            InteractionEvent::Click {
                target: ClickTarget::Selector,
                country: CountryId::new(4).unwrap(),
            }
        );

        let event: InteractionEvent = serde_json::from_str(r#"{"event":"brush_end"}"#).unwrap();
        assert_eq!(event.name(), "brush_end");

        let event: InteractionEvent =
            serde_json::from_str(r#"{"event":"set_bins","count":null}"#).unwrap();
        assert_eq!(event, InteractionEvent::SetBins { count: None });
    }

    #[test]
    fn rejects_zero_country() {
        let result = serde_json::from_str::<InteractionEvent>(
            r#"{"event":"click","target":"map","country":0}"#,
        );
        assert!(result.is_err());
    }
}
