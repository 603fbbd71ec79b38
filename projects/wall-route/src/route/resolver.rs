use crate::route::coach::{CoachPayload, RouteKey, RouteShape, ROUTE_PRECEDENCE};
use crate::route::hold_index::HoldIndex;
use crate::route::types::RouteStep;
use serde_json::Value;
use tracing::debug;

/// Resolve the active route of a coach payload into ordered steps.
///
/// Candidates are tried in `ROUTE_PRECEDENCE` order and the first one with at
/// least one anchored step is used exclusively. No route is a normal outcome
/// and returns an empty sequence.
pub fn resolve_steps(coach: &CoachPayload, index: &HoldIndex) -> Vec<RouteStep> {
    for key in ROUTE_PRECEDENCE {
        let steps = resolve_route(coach, key, index);
        if steps.iter().any(RouteStep::has_anchor) {
            debug!("Using {} with {} steps", key, steps.len());
            return steps;
        }
    }
    debug!("Coach payload carries no usable route");
    Vec::new()
}

/// Resolve a single named candidate, ignoring precedence.
pub fn resolve_route(coach: &CoachPayload, key: RouteKey, index: &HoldIndex) -> Vec<RouteStep> {
    let Some(value) = coach.candidate(key) else {
        return Vec::new();
    };
    match RouteShape::classify(value) {
        Some(shape) => normalize_shape(shape, index),
        None => {
            debug!("{} is neither a step list nor an array; skipping", key);
            Vec::new()
        }
    }
}

pub fn normalize_shape(shape: RouteShape<'_>, index: &HoldIndex) -> Vec<RouteStep> {
    match shape {
        // Steps keep their position as ordinal; anchors are checked at point resolution.
        RouteShape::Steps(items) => items
            .iter()
            .enumerate()
            .map(|(ordinal, item)| RouteStep::from_value(ordinal, item))
            .collect(),
        RouteShape::References(items) => normalize_references(items, index),
    }
}

/// Turns a bare array into steps. Items carrying a `bbox` are kept as they
/// are; others must reference a known hold or are dropped. Ordinals are dense
/// over the surviving items.
fn normalize_references(items: &[Value], index: &HoldIndex) -> Vec<RouteStep> {
    items
        .iter()
        .filter_map(|item| reference_to_step(item, index))
        .enumerate()
        .map(|(ordinal, (mut step, synthesized))| {
            step.ordinal = ordinal;
            if synthesized && step.instruction.is_none() {
                step.instruction = Some(format!("Step {}", ordinal + 1));
            }
            step
        })
        .collect()
}

/// Returns the step and whether its box came from the hold index.
fn reference_to_step(item: &Value, index: &HoldIndex) -> Option<(RouteStep, bool)> {
    let mut step = RouteStep::from_value(0, item);
    if step.bbox.is_some() {
        return Some((step, false));
    }

    let Some(id) = step.hold_id.as_ref() else {
        debug!("Dropping route entry without id or bbox");
        return None;
    };
    let Some(hold) = index.lookup(id) else {
        debug!("Dropping route entry referencing unknown hold {}", id);
        return None;
    };

    step.bbox = Some(hold.bbox);
    step.hold_id = Some(hold.id.clone());
    Some((step, true))
}
