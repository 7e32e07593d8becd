use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::{
    EngineError, Group, GroupId, LedgerEvent, Participant, ParticipantId, ResultEngine,
    compute_balances,
};

mod access;
mod balances;
mod expenses;
mod groups;
mod participants;
mod settlements;

pub use expenses::ExpenseRequest;
pub use settlements::SettlementRequest;

/// Serializable copy of the whole ledger state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Append order is preserved.
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
}

/// In-memory ledger host.
///
/// Reads take `&self` and never mutate; every write takes `&mut self`,
/// validates everything first and only then appends, so a failed write
/// leaves no trace.
#[derive(Debug, Default)]
pub struct Engine {
    participants: BTreeMap<ParticipantId, Participant>,
    groups: BTreeMap<GroupId, Group>,
    events: Vec<LedgerEvent>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            participants: self.participants.values().cloned().collect(),
            groups: self.groups.values().cloned().collect(),
            events: self.events.clone(),
        }
    }

    /// Full history of a group, in append order.
    pub fn group_events(&self, group_id: GroupId) -> ResultEngine<Vec<&LedgerEvent>> {
        self.require_group(group_id)?;
        Ok(self.events_of(group_id).collect())
    }

    fn events_of(&self, group_id: GroupId) -> impl Iterator<Item = &LedgerEvent> {
        self.events
            .iter()
            .filter(move |event| event.group_id() == group_id)
    }

    /// Appends `event` unless the group's balances would leave the
    /// representable range with it.
    fn append(&mut self, event: LedgerEvent) -> ResultEngine<()> {
        compute_balances(self.events_of(event.group_id()).chain(std::iter::once(&event)))?;
        self.events.push(event);
        Ok(())
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    snapshot: LedgerSnapshot,
}

impl EngineBuilder {
    /// Start from a previously saved state.
    pub fn snapshot(mut self, snapshot: LedgerSnapshot) -> EngineBuilder {
        self.snapshot = snapshot;
        self
    }

    /// Construct `Engine`, checking that the snapshot is consistent.
    pub fn build(self) -> ResultEngine<Engine> {
        let LedgerSnapshot {
            participants,
            groups,
            events,
        } = self.snapshot;

        let mut participants_by_id = BTreeMap::new();
        for participant in participants {
            let id = participant.id.clone();
            if participants_by_id.insert(id.clone(), participant).is_some() {
                return Err(EngineError::InvalidInput(format!(
                    "participant {id} already present"
                )));
            }
        }

        let mut groups_by_id = BTreeMap::new();
        for group in groups {
            let unknown: BTreeSet<&ParticipantId> = group
                .members
                .iter()
                .chain(std::iter::once(&group.admin))
                .filter(|id| !participants_by_id.contains_key(*id))
                .collect();
            if let Some(id) = unknown.into_iter().next() {
                return Err(EngineError::NotFound(format!("participant {id}")));
            }
            let id = group.id;
            if groups_by_id.insert(id, group).is_some() {
                return Err(EngineError::InvalidInput(format!(
                    "group {id} already present"
                )));
            }
        }

        let mut event_ids: BTreeSet<Uuid> = BTreeSet::new();
        for event in &events {
            if !groups_by_id.contains_key(&event.group_id()) {
                return Err(EngineError::NotFound(format!("group {}", event.group_id())));
            }
            event.validate()?;
            if !event_ids.insert(event.id()) {
                return Err(EngineError::InvalidInput(format!(
                    "event {} already present",
                    event.id()
                )));
            }
        }
        for group_id in groups_by_id.keys() {
            compute_balances(events.iter().filter(|event| event.group_id() == *group_id))?;
        }

        Ok(Engine {
            participants: participants_by_id,
            groups: groups_by_id,
            events,
        })
    }
}
