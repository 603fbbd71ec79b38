// Lenient readers for the hold detector output.

use crate::route::coach::CoachPayload;
use crate::route::geometry::{normalized_center, normalized_size};
use crate::route::types::{BBox, Hold, HoldId, ImageSize};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

impl Hold {
    /// Reads one detector entry. `position` stands in for a missing id.
    pub fn from_value(position: usize, value: &Value) -> Option<Self> {
        let map = value.as_object()?;

        let bbox = map
            .get("bbox")
            .or_else(|| map.get("box"))
            .and_then(BBox::from_value)?;

        let id = map
            .get("id")
            .and_then(HoldId::from_value)
            .unwrap_or_else(|| HoldId::from_index(position));

        let hold_type = ["type", "class_name", "label"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(Value::as_str)
            .map(str::to_string);

        Some(Self {
            id,
            bbox,
            hold_type,
            confidence: map.get("confidence").map(parse_confidence).unwrap_or(0.0),
        })
    }

    /// Normalized geometry as handed to the path planner
    pub fn normalized(&self, image: ImageSize) -> NormalizedHold {
        NormalizedHold {
            id: self.id.clone(),
            hold_type: self
                .hold_type
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            bbox: self.bbox,
            center_norm: normalized_center(&self.bbox, image),
            bbox_wh_norm: normalized_size(&self.bbox, image),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedHold {
    pub id: HoldId,
    #[serde(rename = "type")]
    pub hold_type: String,
    pub bbox: BBox,
    pub center_norm: [f64; 2],
    pub bbox_wh_norm: [f64; 2],
}

/// Numbers pass through, numeric strings are parsed, anything else is 0.
fn parse_confidence(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Extracts the hold list from a detector document.
///
/// Accepts `{"holds": [...]}`, `{"objects": [...]}` or a bare array. Entries
/// without a usable box are skipped.
pub fn holds_from_document(doc: &Value) -> Vec<Hold> {
    let list = match doc {
        Value::Array(items) => Some(items),
        Value::Object(map) => map
            .get("holds")
            .or_else(|| map.get("objects"))
            .and_then(Value::as_array),
        _ => None,
    };

    let Some(list) = list else {
        warn!("Detector document has no `holds` or `objects` array");
        return Vec::new();
    };

    list.iter()
        .enumerate()
        .filter_map(|(pos, entry)| {
            let hold = Hold::from_value(pos, entry);
            if hold.is_none() {
                warn!("Skipping hold at index {}: missing bbox/box", pos);
            }
            hold
        })
        .collect()
}

pub fn read_holds_file(path: &Path) -> Result<Vec<Hold>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read holds file {}", path.display()))?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    let holds = holds_from_document(&doc);
    info!("Loaded {} holds from {}", holds.len(), path.display());
    Ok(holds)
}

pub fn read_coach_file(path: &Path) -> Result<CoachPayload> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read coach file {}", path.display()))?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(CoachPayload::from_document(&doc))
}
