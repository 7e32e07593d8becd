use std::collections::BTreeSet;

use crate::{
    EngineError, Group, GroupDirectory, GroupId, Participant, ParticipantDirectory,
    ParticipantId, ResultEngine,
};

use super::Engine;

impl Engine {
    pub(super) fn require_group(&self, group_id: GroupId) -> ResultEngine<&Group> {
        self.groups
            .get(&group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))
    }

    pub(super) fn require_group_mut(&mut self, group_id: GroupId) -> ResultEngine<&mut Group> {
        self.groups
            .get_mut(&group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))
    }

    pub(super) fn require_participant(
        &self,
        participant: &ParticipantId,
    ) -> ResultEngine<&Participant> {
        self.participants
            .get(participant)
            .ok_or_else(|| EngineError::NotFound(format!("participant {participant}")))
    }

    /// Only the group administrator may remove members or delete the group.
    pub(super) fn require_group_admin(
        &self,
        group_id: GroupId,
        requester: &ParticipantId,
    ) -> ResultEngine<&Group> {
        let group = self.require_group(group_id)?;
        if !group.is_admin(requester) {
            return Err(EngineError::PermissionDenied(format!(
                "only the admin of group {group_id} can do this"
            )));
        }
        Ok(group)
    }
}

impl GroupDirectory for Engine {
    fn members_of(&self, group_id: GroupId) -> ResultEngine<BTreeSet<ParticipantId>> {
        Ok(self.require_group(group_id)?.members.clone())
    }
}

impl ParticipantDirectory for Engine {
    fn name_of(&self, participant: &ParticipantId) -> Option<&str> {
        self.participants
            .get(participant)
            .map(|participant| participant.name.as_str())
    }
}
