use crate::route::geometry::{bbox_center, percent_position};
use crate::route::types::{Hold, HoldId, ImageSize, Point};
use serde::Serialize;

/// Clickable marker for one detected hold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldMarker {
    pub hold_id: HoldId,
    pub center: Point,
    /// CSS `left`, in percent of the image width
    pub left_pct: f64,
    /// CSS `top`, in percent of the image height
    pub top_pct: f64,
}

/// Markers need the image size to place percentages, so none are produced
/// before it is known.
pub fn hold_markers(holds: &[Hold], image: Option<ImageSize>) -> Vec<HoldMarker> {
    let Some(image) = image else {
        return Vec::new();
    };

    holds
        .iter()
        .map(|hold| {
            let center = bbox_center(&hold.bbox);
            let (left_pct, top_pct) = percent_position(center, image);
            HoldMarker {
                hold_id: hold.id.clone(),
                center,
                left_pct,
                top_pct,
            }
        })
        .collect()
}
