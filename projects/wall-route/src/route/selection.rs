use crate::route::coach::{CoachPayload, RouteKey};
use crate::route::geometry::{bbox_approx_eq, BBOX_TOLERANCE};
use crate::route::hold_index::HoldIndex;
use crate::route::resolver::{resolve_route, resolve_steps};
use crate::route::types::{BBox, Hold, HoldId, RouteStep};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A hold as reported by a click. Unlike detector holds the id may be absent,
/// in which case only the box can match.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickedHold {
    pub id: Option<HoldId>,
    pub bbox: BBox,
    pub hold_type: Option<String>,
    pub confidence: f64,
}

impl ClickedHold {
    /// Same lenient reading as detector holds, without the positional id.
    pub fn from_value(value: &Value) -> Option<Self> {
        let hold = Hold::from_value(0, value)?;
        Some(Self {
            id: value.get("id").and_then(HoldId::from_value),
            bbox: hold.bbox,
            hold_type: hold.hold_type,
            confidence: hold.confidence,
        })
    }
}

impl From<&Hold> for ClickedHold {
    fn from(hold: &Hold) -> Self {
        Self {
            id: Some(hold.id.clone()),
            bbox: hold.bbox,
            hold_type: hold.hold_type.clone(),
            confidence: hold.confidence,
        }
    }
}

/// Ordinal of `hold` in the active route, `None` when no step refers to it.
///
/// A step matches on id equality, or failing that on a box equal within
/// `BBOX_TOLERANCE`. The first match wins.
pub fn index_of(hold: &ClickedHold, coach: &CoachPayload, index: &HoldIndex) -> Option<usize> {
    position_in(&resolve_steps(coach, index), hold)
}

fn position_in(steps: &[RouteStep], hold: &ClickedHold) -> Option<usize> {
    steps
        .iter()
        .find(|step| step_matches(step, hold))
        .map(|step| step.ordinal)
}

fn step_matches(step: &RouteStep, hold: &ClickedHold) -> bool {
    if hold.id.is_some() && step.hold_id == hold.id {
        return true;
    }
    step.bbox
        .as_ref()
        .is_some_and(|bbox| bbox_approx_eq(bbox, &hold.bbox, BBOX_TOLERANCE))
}

/// Confidence as a percentage.
///
/// Values `<= 1` are read as fractions, anything larger as already being a
/// percentage. A detector that reports e.g. `1.0` meaning one percent is
/// misread as 100%; the heuristic is kept as the upstream services expect it.
pub fn confidence_percent(confidence: f64) -> f64 {
    if confidence <= 1.0 {
        confidence * 100.0
    } else {
        confidence
    }
}

/// Everything the info panel shows for a clicked hold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldInfo {
    pub hold_id: Option<HoldId>,
    #[serde(rename = "type")]
    pub hold_type: String,
    pub confidence_pct: f64,
    pub in_route_a: bool,
    pub in_route_b: bool,
    /// Position in the active route; serialized as `-1` when absent
    #[serde(serialize_with = "ordinal_or_sentinel")]
    pub route_index: Option<usize>,
    pub label: String,
}

fn ordinal_or_sentinel<S: Serializer>(ordinal: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    match ordinal {
        Some(n) => serializer.serialize_i64(*n as i64),
        None => serializer.serialize_i64(-1),
    }
}

pub fn describe_hold(hold: &ClickedHold, coach: &CoachPayload, index: &HoldIndex) -> HoldInfo {
    let route_index = index_of(hold, coach, index);
    let in_route = |key| position_in(&resolve_route(coach, key, index), hold).is_some();

    let label = match (route_index, &hold.id) {
        (Some(n), _) => format!("Step {}", n + 1),
        (None, Some(id)) => format!("Hold {}", id),
        (None, None) => "Unnamed hold".to_string(),
    };

    HoldInfo {
        hold_id: hold.id.clone(),
        hold_type: hold
            .hold_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        confidence_pct: confidence_percent(hold.confidence),
        in_route_a: in_route(RouteKey::RouteA),
        in_route_b: in_route(RouteKey::RouteB),
        route_index,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clicked(hold: &Hold) -> ClickedHold {
        ClickedHold::from(hold)
    }

    fn hold(id: i64, bbox: BBox) -> Hold {
        Hold {
            id: HoldId::from(id),
            bbox,
            hold_type: None,
            confidence: 0.5,
        }
    }

    fn setup() -> HoldIndex {
        HoldIndex::new(vec![
            hold(1, BBox::new(0.0, 0.0, 10.0, 10.0)),
            hold(2, BBox::new(10.0, 10.0, 30.0, 30.0)),
            hold(3, BBox::new(50.0, 50.0, 60.0, 60.0)),
        ])
    }

    #[test]
    fn test_index_by_id() {
        let index = setup();
        let coach = CoachPayload::from_value(&json!({"routeA": [{"id": 1}, {"id": "2"}]}));
        assert_eq!(index_of(&clicked(&index.holds()[1]), &coach, &index), Some(1));
    }

    #[test]
    fn test_index_by_bbox_tolerance() {
        let index = setup();
        let coach = CoachPayload::from_value(&json!({"routeA": [
            {"id": 99, "bbox": [0, 0, 10, 10]},
            {"bbox": [10, 10, 30, 30]}
        ]}));
        let tap = hold(42, BBox::new(10.0009, 10.0, 30.0, 30.0));
        assert_eq!(index_of(&clicked(&tap), &coach, &index), Some(1));

        let off = hold(42, BBox::new(10.01, 10.0, 30.0, 30.0));
        assert_eq!(index_of(&clicked(&off), &coach, &index), None);
    }

    #[test]
    fn test_first_match_wins() {
        let index = setup();
        let coach = CoachPayload::from_value(&json!({"route": [
            {"id": 2},
            {"id": 1},
            {"id": 2}
        ]}));
        assert_eq!(index_of(&clicked(&index.holds()[1]), &coach, &index), Some(0));
    }

    #[test]
    fn test_hold_not_in_route() {
        let index = setup();
        let coach = CoachPayload::from_value(&json!({"routeA": [{"id": 1}, {"id": 2}]}));
        assert_eq!(index_of(&clicked(&index.holds()[2]), &coach, &index), None);
        assert_eq!(index_of(&clicked(&index.holds()[2]), &CoachPayload::default(), &index), None);
    }

    #[test]
    fn test_confidence_scale_detection() {
        assert_eq!(confidence_percent(0.5), 50.0);
        assert_eq!(confidence_percent(1.0), 100.0);
        assert_eq!(confidence_percent(87.0), 87.0);
    }

    #[test]
    fn test_describe_hold() {
        let index = setup();
        let coach = CoachPayload::from_value(&json!({
            "routeA": [{"id": 3}, {"id": 1}],
            "routeB": [{"id": 2}]
        }));

        let info = describe_hold(&clicked(&index.holds()[0]), &coach, &index);
        assert_eq!(info.route_index, Some(1));
        assert_eq!(info.label, "Step 2");
        assert!(info.in_route_a);
        assert!(!info.in_route_b);
        assert_eq!(info.hold_type, "Unknown");
        assert_eq!(info.confidence_pct, 50.0);

        let info = describe_hold(&clicked(&index.holds()[1]), &coach, &index);
        assert_eq!(info.route_index, None);
        assert_eq!(info.label, "Hold 2");
        assert!(info.in_route_b);

        let wire = serde_json::to_value(&info).unwrap();
        assert_eq!(wire["route_index"], json!(-1));
        assert_eq!(wire["hold_id"], json!(2));
    }

    #[test]
    fn test_hold_without_id_matches_by_box() {
        let index = setup();
        let coach = CoachPayload::from_value(&json!({"routeA": [
            {"id": 1},
            {"bbox": [10, 10, 30, 30]}
        ]}));
        let tap = ClickedHold::from_value(&json!({"bbox": [10.0009, 10, 30, 30]})).unwrap();
        assert!(tap.id.is_none());
        assert_eq!(index_of(&tap, &coach, &index), Some(1));

        // No positional id, so nothing matches hold 1 by id
        let far = ClickedHold::from_value(&json!({"bbox": [200, 200, 210, 210]})).unwrap();
        let info = describe_hold(&far, &coach, &index);
        assert_eq!(info.route_index, None);
        assert_eq!(info.label, "Unnamed hold");
        assert_eq!(serde_json::to_value(&info).unwrap()["hold_id"], json!(null));
    }
}
