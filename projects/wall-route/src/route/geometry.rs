use crate::route::types::{BBox, ImageSize, Point};

/// Per-coordinate tolerance when two services describe the same hold box
pub const BBOX_TOLERANCE: f64 = 1e-3;

/// Center of a pixel bounding box
pub fn bbox_center(bbox: &BBox) -> Point {
    Point {
        x: (bbox.x1() + bbox.x2()) / 2.0,
        y: (bbox.y1() + bbox.y2()) / 2.0,
    }
}

/// Width and height of a pixel bounding box
pub fn bbox_size(bbox: &BBox) -> (f64, f64) {
    (bbox.x2() - bbox.x1(), bbox.y2() - bbox.y1())
}

/// Box center as a fraction of the image size
pub fn normalized_center(bbox: &BBox, image: ImageSize) -> [f64; 2] {
    let c = bbox_center(bbox);
    [c.x / image.width as f64, c.y / image.height as f64]
}

/// Box size as a fraction of the image size, clamped to at least one pixel per side
pub fn normalized_size(bbox: &BBox, image: ImageSize) -> [f64; 2] {
    let (w, h) = bbox_size(bbox);
    [
        w.max(1.0) / image.width as f64,
        h.max(1.0) / image.height as f64,
    ]
}

/// Map a normalized `[nx, ny]` back into pixels
pub fn denormalize(norm: [f64; 2], image: ImageSize) -> Point {
    Point {
        x: norm[0] * image.width as f64,
        y: norm[1] * image.height as f64,
    }
}

/// Position of a pixel point as percentages of the image (CSS `left`/`top`)
pub fn percent_position(point: Point, image: ImageSize) -> (f64, f64) {
    (
        point.x / image.width as f64 * 100.0,
        point.y / image.height as f64 * 100.0,
    )
}

/// Coordinate-wise box equality within `tolerance`
pub fn bbox_approx_eq(a: &BBox, b: &BBox, tolerance: f64) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(x, y)| (x - y).abs() <= tolerance)
}
