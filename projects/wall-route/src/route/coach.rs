use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Route candidates a coach payload may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKey {
    RouteA,
    Route,
    RouteB,
}

/// Fixed precedence; the first candidate that resolves to at least one step wins.
pub const ROUTE_PRECEDENCE: [RouteKey; 3] = [RouteKey::RouteA, RouteKey::Route, RouteKey::RouteB];

impl RouteKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKey::RouteA => "routeA",
            RouteKey::Route => "route",
            RouteKey::RouteB => "routeB",
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a route candidate. Anything else is not a route.
#[derive(Debug, Clone, Copy)]
pub enum RouteShape<'a> {
    /// `{ "steps": [...] }`: items are already step-like
    Steps(&'a [Value]),
    /// Bare array of steps or hold references
    References(&'a [Value]),
}

impl<'a> RouteShape<'a> {
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => map
                .get("steps")
                .and_then(Value::as_array)
                .map(|steps| RouteShape::Steps(steps.as_slice())),
            Value::Array(items) => Some(RouteShape::References(items.as_slice())),
            _ => None,
        }
    }
}

/// Coach service output. No schema is guaranteed, so the route candidates are
/// kept as raw JSON until resolution.
#[derive(Debug, Clone, Default)]
pub struct CoachPayload {
    route_a: Option<Value>,
    route: Option<Value>,
    route_b: Option<Value>,
    pub difficulty: Option<String>,
    pub notes: Option<String>,
}

impl CoachPayload {
    /// Non-object values yield an empty payload.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            debug!("Coach payload is not an object; treating it as empty");
            return Self::default();
        };

        Self {
            route_a: non_null(map, "routeA"),
            route: non_null(map, "route"),
            route_b: non_null(map, "routeB"),
            difficulty: map
                .get("difficulty")
                .and_then(Value::as_str)
                .map(str::to_string),
            notes: map.get("notes").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// Accepts either a bare payload or the planner response `{ "coach": {...} }`.
    pub fn from_document(doc: &Value) -> Self {
        let has_route = ROUTE_PRECEDENCE
            .iter()
            .any(|key| doc.get(key.as_str()).is_some());
        match doc.get("coach") {
            Some(inner) if !has_route => Self::from_value(inner),
            _ => Self::from_value(doc),
        }
    }

    pub fn candidate(&self, key: RouteKey) -> Option<&Value> {
        match key {
            RouteKey::RouteA => self.route_a.as_ref(),
            RouteKey::Route => self.route.as_ref(),
            RouteKey::RouteB => self.route_b.as_ref(),
        }
    }

    pub fn summary(&self) -> CoachSummary {
        CoachSummary {
            difficulty: self
                .difficulty
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

fn non_null(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).filter(|v| !v.is_null()).cloned()
}

/// Text shown next to the wall once an analysis completes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachSummary {
    pub difficulty: String,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_shapes() {
        let steps = json!({"steps": [{"id": 1}]});
        assert!(matches!(RouteShape::classify(&steps), Some(RouteShape::Steps(s)) if s.len() == 1));

        let bare = json!([{"id": 1}, {"id": 2}]);
        assert!(matches!(RouteShape::classify(&bare), Some(RouteShape::References(s)) if s.len() == 2));

        assert!(RouteShape::classify(&json!({"steps": "x"})).is_none());
        assert!(RouteShape::classify(&json!("route")).is_none());
    }

    #[test]
    fn test_null_candidates_are_absent() {
        let coach = CoachPayload::from_value(&json!({"routeA": null, "route": []}));
        assert!(coach.candidate(RouteKey::RouteA).is_none());
        assert!(coach.candidate(RouteKey::Route).is_some());
        assert!(coach.candidate(RouteKey::RouteB).is_none());
    }

    #[test]
    fn test_from_document_unwraps_planner_response() {
        let doc = json!({"coach": {"routeA": [{"id": 1}], "difficulty": "Hard"}});
        let coach = CoachPayload::from_document(&doc);
        assert!(coach.candidate(RouteKey::RouteA).is_some());
        assert_eq!(coach.difficulty.as_deref(), Some("Hard"));

        let bare = json!({"routeB": [], "notes": "go"});
        let coach = CoachPayload::from_document(&bare);
        assert!(coach.candidate(RouteKey::RouteB).is_some());
    }

    #[test]
    fn test_summary_defaults() {
        let summary = CoachPayload::from_value(&json!(null)).summary();
        assert_eq!(summary.difficulty, "Unknown");
        assert_eq!(summary.notes, "");
    }
}
