//! Participants (people who can owe or be owed money).
//!
//! Participants are owned by the user directory; the engine keeps the id and
//! the display name, which is only used to decorate output.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// Display name used when a participant cannot be resolved.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: String) -> Self {
        Self { id, name }
    }
}
