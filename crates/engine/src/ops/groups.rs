use chrono::{DateTime, Utc};

use crate::{
    EngineError, Group, GroupId, LedgerEvent, ParticipantId, ResultEngine, is_group_settled,
    is_participant_settled,
};

use super::{Engine, normalize_optional_text, normalize_required_name};

impl Engine {
    /// Creates a group administered by `admin`.
    ///
    /// Every listed member must be a registered participant; the admin is
    /// always added to the members.
    pub fn create_group(
        &mut self,
        name: &str,
        description: Option<&str>,
        admin: &ParticipantId,
        members: &[ParticipantId],
        created_at: DateTime<Utc>,
    ) -> ResultEngine<GroupId> {
        let name = normalize_required_name(name, "group")?;
        self.require_participant(admin)?;

        let missing: Vec<&str> = members
            .iter()
            .filter(|id| !self.participants.contains_key(*id))
            .map(ParticipantId::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::NotFound(format!(
                "participants [{}]",
                missing.join(", ")
            )));
        }

        let group = Group::new(
            name,
            normalize_optional_text(description),
            admin.clone(),
            members.iter().cloned(),
            created_at,
        );
        let group_id = group.id;
        self.groups.insert(group_id, group);
        Ok(group_id)
    }

    pub fn group(&self, group_id: GroupId) -> ResultEngine<&Group> {
        self.require_group(group_id)
    }

    /// Groups `participant` currently belongs to, oldest first.
    pub fn groups_of(&self, participant: &ParticipantId) -> ResultEngine<Vec<&Group>> {
        self.require_participant(participant)?;
        let mut groups: Vec<&Group> = self
            .groups
            .values()
            .filter(|group| group.is_member(participant))
            .collect();
        groups.sort_by_key(|group| group.created_at);
        Ok(groups)
    }

    pub fn add_member(
        &mut self,
        group_id: GroupId,
        participant: &ParticipantId,
    ) -> ResultEngine<()> {
        self.require_group(group_id)?;
        self.require_participant(participant)?;

        let group = self.require_group_mut(group_id)?;
        if !group.members.insert(participant.clone()) {
            return Err(EngineError::InvalidInput(format!(
                "participant {participant} is already in the group"
            )));
        }
        Ok(())
    }

    /// Removes a member (admin-only). The member's balance in the group must
    /// be settled; their past events stay in the history.
    pub fn remove_member(
        &mut self,
        group_id: GroupId,
        participant: &ParticipantId,
        requester: &ParticipantId,
    ) -> ResultEngine<()> {
        let group = self.require_group_admin(group_id, requester)?;
        if group.is_admin(participant) {
            return Err(EngineError::InvalidInput(
                "admin cannot be removed from the group".to_string(),
            ));
        }
        self.require_participant(participant)?;
        if !group.is_member(participant) {
            return Err(EngineError::NotFound(format!(
                "participant {participant} in group {group_id}"
            )));
        }

        if !is_participant_settled(self.events_of(group_id), participant)? {
            return Err(EngineError::PreconditionFailed(format!(
                "participant {participant} has an unsettled balance; settle up before removing"
            )));
        }

        self.require_group_mut(group_id)?.members.remove(participant);
        Ok(())
    }

    /// Deletes a group and its whole history (admin-only, group must be
    /// settled).
    pub fn delete_group(
        &mut self,
        group_id: GroupId,
        requester: &ParticipantId,
    ) -> ResultEngine<()> {
        self.require_group_admin(group_id, requester)?;

        if !is_group_settled(self.events_of(group_id))? {
            return Err(EngineError::PreconditionFailed(format!(
                "group {group_id} has unsettled balances"
            )));
        }

        // 1) settlements
        self.events.retain(|event| {
            !matches!(event, LedgerEvent::Settlement(settlement) if settlement.group_id == group_id)
        });
        // 2) expenses, together with the splits they own
        self.events.retain(|event| {
            !matches!(event, LedgerEvent::Expense(expense) if expense.group_id == group_id)
        });
        // 3) group
        self.groups.remove(&group_id);

        Ok(())
    }
}
