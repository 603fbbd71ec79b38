use crate::route::geometry::{bbox_center, denormalize};
use crate::route::hold_index::HoldIndex;
use crate::route::types::{ImageSize, Point, RouteStep};

/// Which piece of step data produced a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    Normalized,
    BBox,
    HoldLookup,
}

/// Pixel position of a step, or `None` when nothing usable is attached.
///
/// Normalized coordinates win when both `center_norm` and `bbox_wh_norm` are
/// present and the image size is known. Otherwise the step's own box, then the
/// box of the referenced hold.
pub fn resolve_point(step: &RouteStep, index: &HoldIndex, image: Option<ImageSize>) -> Option<Point> {
    resolve_point_with_source(step, index, image).map(|(point, _)| point)
}

pub fn resolve_point_with_source(
    step: &RouteStep,
    index: &HoldIndex,
    image: Option<ImageSize>,
) -> Option<(Point, PointSource)> {
    if let (Some(center), Some(_), Some(image)) = (step.center_norm, step.bbox_wh_norm, image) {
        return Some((denormalize(center, image), PointSource::Normalized));
    }

    if let Some(bbox) = &step.bbox {
        return Some((bbox_center(bbox), PointSource::BBox));
    }

    step.hold_id
        .as_ref()
        .and_then(|id| index.lookup(id))
        .map(|hold| (bbox_center(&hold.bbox), PointSource::HoldLookup))
}
