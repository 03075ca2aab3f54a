use serde::{Deserialize, Serialize};

use super::lot::Lot;

/// The persisted data container: every lot the user has entered, in the
/// order they were added.
///
/// Serialized transparently, so the file on disk is a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    pub lots: Vec<Lot>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}
