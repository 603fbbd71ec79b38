use crate::overlay::markers::HoldMarker;
use crate::route::types::Point;

/// Drawing target for a route overlay.
///
/// `clear` must drop everything drawn so far so that a render can be repeated
/// without accumulating shapes.
pub trait OverlaySurface {
    fn clear(&mut self);

    fn draw_segment(&mut self, from: Point, to: Point);

    fn draw_marker(&mut self, at: Point, label: &str);

    /// Clickable marker for a detected hold. Surfaces that only show the path ignore it.
    fn draw_hold_marker(&mut self, _marker: &HoldMarker) {}
}
