//! Collaborator capabilities the core consumes.
//!
//! Group membership and display names are owned by the surrounding service.
//! [`Engine`](crate::Engine) implements both traits over its own state; any
//! other host can plug in its directory instead.

use std::collections::{BTreeMap, BTreeSet};

use crate::{GroupId, ParticipantId, ResultEngine, participants::UNKNOWN_NAME};

/// Resolves the current members of a group.
pub trait GroupDirectory {
    /// Fails with [`EngineError::NotFound`](crate::EngineError::NotFound) for
    /// an unknown group.
    fn members_of(&self, group_id: GroupId) -> ResultEngine<BTreeSet<ParticipantId>>;
}

/// Resolves display names. Names decorate output only, never identity.
pub trait ParticipantDirectory {
    fn name_of(&self, participant: &ParticipantId) -> Option<&str>;

    /// Like [`name_of`](Self::name_of), falling back to `"Unknown"`.
    fn display_name(&self, participant: &ParticipantId) -> String {
        self.name_of(participant).unwrap_or(UNKNOWN_NAME).to_string()
    }
}

impl ParticipantDirectory for BTreeMap<ParticipantId, String> {
    fn name_of(&self, participant: &ParticipantId) -> Option<&str> {
        self.get(participant).map(String::as_str)
    }
}
