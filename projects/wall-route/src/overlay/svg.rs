use crate::overlay::markers::HoldMarker;
use crate::overlay::surface::OverlaySurface;
use crate::route::types::{ImageSize, Point};
use serde::{Deserialize, Serialize};

/// Colours and sizes of the overlay shapes, in image pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub path_color: String,
    pub path_width: f64,
    pub node_radius: f64,
    pub node_fill: String,
    pub label_color: String,
    pub hold_color: String,
    pub hold_radius: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            path_color: "#3ddc97".to_string(),
            path_width: 4.0,
            node_radius: 14.0,
            node_fill: "#0d1117".to_string(),
            label_color: "#ffffff".to_string(),
            hold_color: "#58a6ff".to_string(),
            hold_radius: 6.0,
        }
    }
}

/// SVG overlay sized to the wall photo.
///
/// Hold markers sit in their own group below the route so the path stays
/// readable where it crosses holds.
#[derive(Debug, Clone)]
pub struct SvgOverlay {
    size: Option<ImageSize>,
    style: OverlayStyle,
    holds: Vec<HoldMarker>,
    segments: Vec<(Point, Point)>,
    nodes: Vec<(Point, String)>,
}

impl SvgOverlay {
    pub fn new(size: Option<ImageSize>, style: OverlayStyle) -> Self {
        Self {
            size,
            style,
            holds: Vec::new(),
            segments: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        match self.size {
            Some(size) => out.push_str(&format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                w = size.width,
                h = size.height
            )),
            None => out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg">"#),
        }
        out.push('\n');

        let style = &self.style;

        out.push_str(r#"  <g class="holds">"#);
        out.push('\n');
        for marker in &self.holds {
            out.push_str(&format!(
                r#"    <circle class="hold-marker" data-hold-id="{}" cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="2"/>"#,
                escape_xml(&marker.hold_id.to_string()),
                marker.center.x,
                marker.center.y,
                style.hold_radius,
                escape_xml(&style.hold_color),
            ));
            out.push('\n');
        }
        out.push_str("  </g>\n");

        out.push_str(r#"  <g class="route">"#);
        out.push('\n');
        for (from, to) in &self.segments {
            out.push_str(&format!(
                r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
                from.x,
                from.y,
                to.x,
                to.y,
                escape_xml(&style.path_color),
                style.path_width,
            ));
            out.push('\n');
        }
        for (at, label) in &self.nodes {
            out.push_str(&format!(
                r#"    <g class="route-node"><circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="2"/><text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="central" font-size="{:.2}" fill="{}">{}</text></g>"#,
                at.x,
                at.y,
                style.node_radius,
                escape_xml(&style.node_fill),
                escape_xml(&style.path_color),
                at.x,
                at.y,
                style.node_radius,
                escape_xml(&style.label_color),
                escape_xml(label),
            ));
            out.push('\n');
        }
        out.push_str("  </g>\n");
        out.push_str("</svg>\n");
        out
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl OverlaySurface for SvgOverlay {
    fn clear(&mut self) {
        self.holds.clear();
        self.segments.clear();
        self.nodes.clear();
    }

    fn draw_segment(&mut self, from: Point, to: Point) {
        self.segments.push((from, to));
    }

    fn draw_marker(&mut self, at: Point, label: &str) {
        self.nodes.push((at, label.to_string()));
    }

    fn draw_hold_marker(&mut self, marker: &HoldMarker) {
        self.holds.push(marker.clone());
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
