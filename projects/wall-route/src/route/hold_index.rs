use crate::route::types::{Hold, HoldId};
use std::collections::HashMap;
use tracing::debug;

/// Read-only lookup of the holds of one analysis, keyed by canonical id.
#[derive(Debug, Clone, Default)]
pub struct HoldIndex {
    holds: Vec<Hold>,
    by_id: HashMap<String, usize>,
}

impl HoldIndex {
    /// When two holds share an id, the first one wins.
    pub fn new(holds: Vec<Hold>) -> Self {
        let mut by_id = HashMap::with_capacity(holds.len());
        for (pos, hold) in holds.iter().enumerate() {
            if by_id.contains_key(hold.id.as_str()) {
                debug!("Duplicate hold id {}; keeping the first occurrence", hold.id);
                continue;
            }
            by_id.insert(hold.id.as_str().to_string(), pos);
        }
        Self { holds, by_id }
    }

    pub fn lookup(&self, id: &HoldId) -> Option<&Hold> {
        self.lookup_key(id.as_str())
    }

    pub fn lookup_key(&self, key: &str) -> Option<&Hold> {
        self.by_id.get(key).map(|&pos| &self.holds[pos])
    }

    pub fn holds(&self) -> &[Hold] {
        &self.holds
    }

    pub fn len(&self) -> usize {
        self.holds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::types::BBox;
    use serde_json::json;

    fn hold(id: HoldId, x: f64) -> Hold {
        Hold {
            id,
            bbox: BBox::new(x, 0.0, x + 10.0, 10.0),
            hold_type: None,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_lookup_across_id_types() {
        let index = HoldIndex::new(vec![
            hold(HoldId::from(3), 0.0),
            hold(HoldId::from("b7"), 20.0),
        ]);
        let by_string = HoldId::from_value(&json!("3")).unwrap();
        assert_eq!(index.lookup(&by_string).map(|h| h.bbox.x1()), Some(0.0));
        assert_eq!(index.lookup_key("b7").map(|h| h.bbox.x1()), Some(20.0));
        assert!(index.lookup_key("missing").is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let index = HoldIndex::new(vec![
            hold(HoldId::from(1), 0.0),
            hold(HoldId::from(1), 50.0),
        ]);
        assert_eq!(index.lookup_key("1").map(|h| h.bbox.x1()), Some(0.0));
        assert_eq!(index.holds().len(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = HoldIndex::default();
        assert!(index.is_empty());
        assert!(index.lookup_key("0").is_none());
    }
}
