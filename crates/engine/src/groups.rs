//! Groups of participants sharing expenses.
//!
//! Only the membership at evaluation time matters; removing a member keeps
//! their historical events in the ledger.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GroupId, ParticipantId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    /// The designated administrator (the creator). Always a member.
    pub admin: ParticipantId,
    pub members: BTreeSet<ParticipantId>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(
        name: String,
        description: Option<String>,
        admin: ParticipantId,
        members: impl IntoIterator<Item = ParticipantId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut members: BTreeSet<ParticipantId> = members.into_iter().collect();
        members.insert(admin.clone());
        Self {
            id: GroupId::new_v4(),
            name,
            description,
            admin,
            members,
            created_at,
        }
    }

    pub fn is_member(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn is_admin(&self, participant: &ParticipantId) -> bool {
        &self.admin == participant
    }
}
