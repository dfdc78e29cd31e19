use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-unique identifier minted when an RTxP instance is created.
///
/// Carried in every log line and event for correlation; never persisted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PublishId(Uuid);

impl PublishId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PublishId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PublishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PublishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
