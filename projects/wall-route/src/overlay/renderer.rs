use crate::overlay::markers::HoldMarker;
use crate::overlay::surface::OverlaySurface;
use crate::route::coach::CoachPayload;
use crate::route::hold_index::HoldIndex;
use crate::route::point::resolve_point;
use crate::route::resolver::resolve_steps;
use crate::route::types::{HoldId, ImageSize, Point, RouteStep};
use serde::Serialize;
use tracing::debug;

/// A route step that resolved to a pixel position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathNode {
    pub ordinal: usize,
    /// One-based, fixed at resolution time
    pub label: String,
    pub point: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_id: Option<HoldId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

/// Keeps only steps with a position. Skipped steps do not renumber the rest.
pub fn plan_path(steps: &[RouteStep], index: &HoldIndex, image: Option<ImageSize>) -> Vec<PathNode> {
    steps
        .iter()
        .filter_map(|step| {
            let Some(point) = resolve_point(step, index, image) else {
                if step.has_anchor() {
                    debug!("Step {} could not be placed; skipping", step.label());
                } else {
                    debug!("Step {} has no hold, box or coordinates; skipping", step.label());
                }
                return None;
            };
            Some(PathNode {
                ordinal: step.ordinal,
                label: step.label(),
                point,
                hold_id: step.hold_id.clone(),
                instruction: step.instruction.clone(),
            })
        })
        .collect()
}

/// Clear `surface` and draw the active route of `coach`.
///
/// Consecutive positioned nodes are joined by segments, then every node gets a
/// labelled marker on top. Returns the drawn nodes.
pub fn render_route<S: OverlaySurface + ?Sized>(
    surface: &mut S,
    index: &HoldIndex,
    coach: &CoachPayload,
    image: Option<ImageSize>,
) -> Vec<PathNode> {
    surface.clear();

    let steps = resolve_steps(coach, index);
    let nodes = plan_path(&steps, index, image);

    for pair in nodes.windows(2) {
        surface.draw_segment(pair[0].point, pair[1].point);
    }
    for node in &nodes {
        surface.draw_marker(node.point, &node.label);
    }

    debug!("Rendered {} of {} route steps", nodes.len(), steps.len());
    nodes
}

pub fn draw_hold_markers<S: OverlaySurface + ?Sized>(surface: &mut S, markers: &[HoldMarker]) {
    for marker in markers {
        surface.draw_hold_marker(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::surface::recording::{Op, RecordingSurface};
    use crate::route::types::{BBox, Hold};
    use serde_json::json;

    fn index() -> HoldIndex {
        HoldIndex::new(vec![
            Hold {
                id: HoldId::from(1),
                bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
                hold_type: None,
                confidence: 0.9,
            },
            Hold {
                id: HoldId::from(2),
                bbox: BBox::new(20.0, 20.0, 40.0, 40.0),
                hold_type: None,
                confidence: 0.9,
            },
        ])
    }

    #[test]
    fn test_gap_keeps_original_labels() {
        let coach = CoachPayload::from_value(&json!({"routeA": {"steps": [
            {"hold_id": 1},
            {"instruction": "shake out"},
            {"bbox": [100, 100, 120, 120]}
        ]}}));
        let mut surface = RecordingSurface::default();
        let nodes = render_route(&mut surface, &index(), &coach, ImageSize::new(200, 200));

        assert_eq!(nodes.len(), 2);
        assert_eq!(
            surface.segments(),
            vec![(Point { x: 5.0, y: 5.0 }, Point { x: 110.0, y: 110.0 })]
        );
        assert_eq!(surface.labels(), vec!["1".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let coach = CoachPayload::from_value(&json!({"routeA": [{"id": 1}, {"id": 2}]}));
        let idx = index();
        let mut surface = RecordingSurface::default();

        render_route(&mut surface, &idx, &coach, ImageSize::new(100, 100));
        let first = surface.ops.clone();
        render_route(&mut surface, &idx, &coach, ImageSize::new(100, 100));

        assert_eq!(surface.ops, first);
        assert_eq!(surface.clears, 2);
        assert_eq!(surface.segments().len(), 1);
        assert_eq!(surface.labels().len(), 2);
    }

    #[test]
    fn test_empty_route_clears_previous_overlay() {
        let idx = index();
        let mut surface = RecordingSurface::default();
        let coach = CoachPayload::from_value(&json!({"route": [{"id": 1}, {"id": 2}]}));
        render_route(&mut surface, &idx, &coach, None);
        assert!(!surface.ops.is_empty());

        let nodes = render_route(&mut surface, &idx, &CoachPayload::default(), None);
        assert!(nodes.is_empty());
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_single_node_has_no_segment() {
        let coach = CoachPayload::from_value(&json!({"routeB": [{"id": 2}]}));
        let mut surface = RecordingSurface::default();
        render_route(&mut surface, &index(), &coach, None);
        assert_eq!(
            surface.ops,
            vec![Op::Marker(Point { x: 30.0, y: 30.0 }, "1".to_string())]
        );
    }

    #[test]
    fn test_plan_path_uses_normalized_points() {
        let steps = vec![RouteStep {
            ordinal: 0,
            hold_id: Some(HoldId::from(1)),
            bbox: Some(BBox::new(0.0, 0.0, 10.0, 10.0)),
            center_norm: Some([0.5, 0.5]),
            bbox_wh_norm: Some([0.1, 0.1]),
            instruction: None,
        }];
        let nodes = plan_path(&steps, &index(), ImageSize::new(200, 100));
        assert_eq!(nodes[0].point, Point { x: 100.0, y: 50.0 });
        let nodes = plan_path(&steps, &index(), None);
        assert_eq!(nodes[0].point, Point { x: 5.0, y: 5.0 });
    }
}
