use crate::overlay::svg::OverlayStyle;
use crate::route::coach::CoachPayload;
use crate::route::loader::holds_from_document;
use crate::route::selection::{ClickedHold, HoldInfo};
use crate::route::types::{HoldId, ImageSize};
use crate::session::{AnalysisSession, RenderedOverlay};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Shared server state. The session is replaced whole on every analysis.
pub struct AppState {
    pub style: OverlayStyle,
    session: RwLock<Option<AnalysisSession>>,
}

impl AppState {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            session: RwLock::new(None),
        }
    }

    fn replace_session(&self, session: AnalysisSession) -> Result<(), StatusCode> {
        let mut slot = self.session.write().map_err(|_| {
            warn!("Session lock poisoned");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        *slot = Some(session);
        Ok(())
    }

    fn with_session<T>(&self, f: impl FnOnce(&AnalysisSession) -> Result<T, StatusCode>) -> Result<T, StatusCode> {
        let guard = self
            .session
            .read()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        let session = guard.as_ref().ok_or(StatusCode::NOT_FOUND)?;
        f(session)
    }
}

/// Completed analysis: detector holds plus planner coach payload
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub holds: Value,
    #[serde(default)]
    pub coach: Value,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
}

/// A clicked hold, either as the full hold object or by id
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub hold: Option<Value>,
    pub hold_id: Option<Value>,
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn create_analysis_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnalysisRequest>,
) -> Result<Json<RenderedOverlay>, StatusCode> {
    let holds = holds_from_document(&payload.holds);
    let coach = CoachPayload::from_document(&payload.coach);
    let image = ImageSize::from_optional(payload.image_width, payload.image_height);

    let session = AnalysisSession::new(holds, coach, image);
    let rendered = session.render(&state.style);
    info!(
        "Analysis rendered: {} steps, {} nodes",
        rendered.steps.len(),
        rendered.nodes.len()
    );

    state.replace_session(session)?;
    Ok(Json(rendered))
}

pub async fn get_overlay_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RenderedOverlay>, StatusCode> {
    state
        .with_session(|session| Ok(session.render(&state.style)))
        .map(Json)
}

pub async fn select_hold_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<HoldInfo>, StatusCode> {
    state
        .with_session(|session| match (&payload.hold, &payload.hold_id) {
            (Some(hold), _) => {
                let hold = ClickedHold::from_value(hold).ok_or(StatusCode::BAD_REQUEST)?;
                Ok(session.describe(&hold))
            }
            (None, Some(id)) => {
                let id = HoldId::from_value(id).ok_or(StatusCode::BAD_REQUEST)?;
                session.select(&id).ok_or(StatusCode::NOT_FOUND)
            }
            (None, None) => Err(StatusCode::BAD_REQUEST),
        })
        .map(Json)
}
