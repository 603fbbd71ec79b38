use crate::overlay::markers::{hold_markers, HoldMarker};
use crate::overlay::renderer::{draw_hold_markers, render_route, PathNode};
use crate::overlay::svg::{OverlayStyle, SvgOverlay};
use crate::route::coach::{CoachPayload, CoachSummary};
use crate::route::hold_index::HoldIndex;
use crate::route::loader::{read_coach_file, read_holds_file, NormalizedHold};
use crate::route::resolver::resolve_steps;
use crate::route::selection::{describe_hold, ClickedHold, HoldInfo};
use crate::route::types::{Hold, HoldId, ImageSize, RouteStep};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Everything known about one analysed wall photo.
///
/// A new analysis builds a new session; nothing is updated in place.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub created_at: DateTime<Utc>,
    index: HoldIndex,
    coach: CoachPayload,
    image: Option<ImageSize>,
}

/// Result of drawing a session
#[derive(Debug, Clone, Serialize)]
pub struct RenderedOverlay {
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSize>,
    pub hold_count: usize,
    pub steps: Vec<RouteStep>,
    pub nodes: Vec<PathNode>,
    pub markers: Vec<HoldMarker>,
    pub summary: CoachSummary,
    pub svg: String,
}

impl AnalysisSession {
    pub fn new(holds: Vec<Hold>, coach: CoachPayload, image: Option<ImageSize>) -> Self {
        info!(
            "New analysis session: {} holds, image {:?}",
            holds.len(),
            image.map(|s| (s.width, s.height))
        );
        Self {
            created_at: Utc::now(),
            index: HoldIndex::new(holds),
            coach,
            image,
        }
    }

    pub fn from_files(holds_path: &Path, coach_path: &Path, image: Option<ImageSize>) -> Result<Self> {
        let holds = read_holds_file(holds_path)?;
        let coach = read_coach_file(coach_path)?;
        Ok(Self::new(holds, coach, image))
    }

    pub fn holds(&self) -> &[Hold] {
        self.index.holds()
    }

    pub fn image(&self) -> Option<ImageSize> {
        self.image
    }

    /// Holds with normalized geometry, as the path planner consumes them.
    /// Empty until the image size is known.
    pub fn normalized_holds(&self) -> Vec<NormalizedHold> {
        match self.image {
            Some(image) => self.holds().iter().map(|h| h.normalized(image)).collect(),
            None => Vec::new(),
        }
    }

    pub fn steps(&self) -> Vec<RouteStep> {
        resolve_steps(&self.coach, &self.index)
    }

    pub fn summary(&self) -> CoachSummary {
        self.coach.summary()
    }

    /// Clear `surface`, then draw the route and the hold markers.
    pub fn draw(&self, surface: &mut SvgOverlay) -> (Vec<PathNode>, Vec<HoldMarker>) {
        let nodes = render_route(surface, &self.index, &self.coach, self.image);
        let markers = hold_markers(self.index.holds(), self.image);
        draw_hold_markers(surface, &markers);
        (nodes, markers)
    }

    pub fn render(&self, style: &OverlayStyle) -> RenderedOverlay {
        let mut surface = SvgOverlay::new(self.image, style.clone());
        let (nodes, markers) = self.draw(&mut surface);
        debug!(
            "SVG overlay: {} nodes, {} segments",
            surface.node_count(),
            surface.segment_count()
        );
        RenderedOverlay {
            created_at: self.created_at,
            image: self.image,
            hold_count: self.index.len(),
            steps: self.steps(),
            nodes,
            markers,
            summary: self.summary(),
            svg: surface.to_svg(),
        }
    }

    /// Info for a clicked hold, matched against the active route by id or box
    pub fn describe(&self, hold: &ClickedHold) -> HoldInfo {
        describe_hold(hold, &self.coach, &self.index)
    }

    /// Like `describe`, for a hold known to this session by id
    pub fn select(&self, id: &HoldId) -> Option<HoldInfo> {
        self.index
            .lookup(id)
            .map(|hold| self.describe(&ClickedHold::from(hold)))
    }
}

/// Natural pixel size of a photo on disk
pub fn image_size_from_file(path: &Path) -> Result<ImageSize> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("Failed to read image dimensions of {}", path.display()))?;
    ImageSize::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Image {} has zero size", path.display()))
}
