//! Dense identifier allocation
//!
//! The library file keys tracks and playlist items by small sequential
//! integers, while source rows carry sparse 64-bit persistent IDs.

use crate::error::DataIntegrityError;
use crate::model::persistent_id_hex;
use std::collections::HashMap;

/// Allocates dense IDs for one build pass and remembers where they came from
#[derive(Debug)]
pub struct IdRemapper {
    next: u32,
    dense_by_persistent: HashMap<i64, u32>,
}

impl IdRemapper {
    pub fn new() -> Self {
        Self {
            next: 1,
            dense_by_persistent: HashMap::new(),
        }
    }

    /// Next dense ID (1, 2, 3, ...), shared by every entity kind
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Record that `persistent` was assigned `dense`
    pub fn remember(&mut self, persistent: i64, dense: u32) {
        self.dense_by_persistent.insert(persistent, dense);
    }

    /// Look up the dense ID previously remembered for `persistent`
    pub fn resolve(&self, persistent: i64) -> Result<u32, DataIntegrityError> {
        self.dense_by_persistent
            .get(&persistent)
            .copied()
            .ok_or_else(|| DataIntegrityError::unresolved_track(persistent_id_hex(persistent)))
    }

    /// Number of IDs handed out so far
    pub fn allocated(&self) -> u32 {
        self.next - 1
    }
}

impl Default for IdRemapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut remapper = IdRemapper::new();
        assert_eq!(remapper.next_id(), 1);
        assert_eq!(remapper.next_id(), 2);
        assert_eq!(remapper.next_id(), 3);
        assert_eq!(remapper.allocated(), 3);
    }

    #[test]
    fn test_resolve_remembered_key() {
        let mut remapper = IdRemapper::new();
        let id = remapper.next_id();
        remapper.remember(-42, id);
        assert_eq!(remapper.resolve(-42), Ok(1));
    }

    #[test]
    fn test_resolve_unknown_key_fails() {
        let remapper = IdRemapper::new();
        let err = remapper.resolve(255).unwrap_err();
        assert_eq!(err, DataIntegrityError::unresolved_track("00000000000000FF"));
    }
}
