// Core value types shared by the route resolution stages.
//
// Producers disagree on shapes (numeric vs string ids, optional fields), so the
// constructors here read leniently from `serde_json::Value` and serialize back
// in the canonical form.

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a hold as emitted by a producer.
///
/// Equality and hashing use the canonical string form, so `3`, `3.0` and `"3"`
/// all name the same hold. Serialization writes the original value back.
#[derive(Debug, Clone)]
pub struct HoldId {
    key: String,
    raw: Value,
}

impl HoldId {
    /// Returns `None` for values that cannot act as identifiers (null, bool, objects).
    pub fn from_value(value: &Value) -> Option<Self> {
        let key = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => canonical_number(n),
            _ => return None,
        };
        Some(Self {
            key,
            raw: value.clone(),
        })
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            key: index.to_string(),
            raw: Value::from(index),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

/// Integral floats print without a fractional part, matching how the web
/// frontend stringifies numbers.
fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl PartialEq for HoldId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HoldId {}

impl Hash for HoldId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for HoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl Serialize for HoldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl From<i64> for HoldId {
    fn from(id: i64) -> Self {
        Self {
            key: id.to_string(),
            raw: Value::from(id),
        }
    }
}

impl From<&str> for HoldId {
    fn from(id: &str) -> Self {
        Self {
            key: id.to_string(),
            raw: Value::from(id),
        }
    }
}

/// Pixel bounding box `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox(pub [f64; 4]);

impl BBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self([x1, y1, x2, y2])
    }

    /// Accepts a four element array of finite numbers; anything else is `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 4 {
            return None;
        }
        let mut coords = [0.0; 4];
        for (slot, item) in coords.iter_mut().zip(items) {
            let v = item.as_f64()?;
            if !v.is_finite() {
                return None;
            }
            *slot = v;
        }
        Some(Self(coords))
    }

    pub fn x1(&self) -> f64 {
        self.0[0]
    }

    pub fn y1(&self) -> f64 {
        self.0[1]
    }

    pub fn x2(&self) -> f64 {
        self.0[2]
    }

    pub fn y2(&self) -> f64 {
        self.0[3]
    }
}

/// A pixel-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Natural pixel size of the wall photo. Only constructed for positive sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Zero in either dimension means "not known yet".
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub fn from_optional(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        Self::new(width?, height?)
    }
}

/// A detected hold. Immutable for the lifetime of an analysis session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hold {
    pub id: HoldId,
    pub bbox: BBox,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub hold_type: Option<String>,
    pub confidence: f64,
}

/// Canonical route step after resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub ordinal: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_id: Option<HoldId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_norm: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox_wh_norm: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

/// Identifier keys checked on a step-like object, in priority order.
pub const STEP_ID_KEYS: [&str; 3] = ["id", "hold_id", "holdId"];

impl RouteStep {
    /// Reads a step-like JSON value without judging whether it is resolvable.
    /// A bare scalar is taken as a hold reference.
    pub fn from_value(ordinal: usize, value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self {
                ordinal,
                hold_id: HoldId::from_value(value),
                bbox: None,
                center_norm: None,
                bbox_wh_norm: None,
                instruction: None,
            };
        };

        let hold_id = STEP_ID_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(HoldId::from_value);

        Self {
            ordinal,
            hold_id,
            bbox: map.get("bbox").and_then(BBox::from_value),
            center_norm: map.get("center_norm").and_then(pair_from_value),
            bbox_wh_norm: map.get("bbox_wh_norm").and_then(pair_from_value),
            instruction: map
                .get("instruction")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// One-based label shown on the rendered node.
    pub fn label(&self) -> String {
        (self.ordinal + 1).to_string()
    }

    pub fn has_anchor(&self) -> bool {
        self.hold_id.is_some() || self.bbox.is_some() || self.center_norm.is_some()
    }
}

fn pair_from_value(value: &Value) -> Option<[f64; 2]> {
    let items = value.as_array()?;
    if items.len() != 2 {
        return None;
    }
    let a = items[0].as_f64()?;
    let b = items[1].as_f64()?;
    if a.is_finite() && b.is_finite() {
        Some([a, b])
    } else {
        None
    }
}
