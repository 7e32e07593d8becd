//! Settlement checks guarding member removal and group deletion.

use serde::{Deserialize, Serialize};

use crate::{LedgerEvent, MoneyCents, ParticipantId, ResultEngine, compute_balances};

/// Group deletion tolerates up to ten cents per participant of aggregate
/// rounding noise; member removal requires an exactly settled balance.
pub const GROUP_SETTLED_TOLERANCE: MoneyCents = MoneyCents::new(10);

/// What [`check_settled`] looks at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "participant", rename_all = "snake_case")]
pub enum SettlementScope {
    Participant(ParticipantId),
    Group,
}

/// `true` iff `participant`'s net balance over `events` is below one cent.
pub fn is_participant_settled<'a>(
    events: impl IntoIterator<Item = &'a LedgerEvent>,
    participant: &ParticipantId,
) -> ResultEngine<bool> {
    Ok(compute_balances(events)?.get(participant).is_negligible())
}

/// `true` iff every participant's net balance is within
/// [`GROUP_SETTLED_TOLERANCE`].
pub fn is_group_settled<'a>(
    events: impl IntoIterator<Item = &'a LedgerEvent>,
) -> ResultEngine<bool> {
    Ok(compute_balances(events)?
        .iter()
        .all(|(_, amount)| amount.is_within(MoneyCents::ZERO, GROUP_SETTLED_TOLERANCE)))
}

pub fn check_settled<'a>(
    events: impl IntoIterator<Item = &'a LedgerEvent>,
    scope: &SettlementScope,
) -> ResultEngine<bool> {
    match scope {
        SettlementScope::Participant(participant) => is_participant_settled(events, participant),
        SettlementScope::Group => is_group_settled(events),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{Expense, GroupId, Settlement, Split, SplitPolicy};

    fn exact_expense(group: GroupId, payer: &str, shares: &[(&str, i64)]) -> LedgerEvent {
        let total: i64 = shares.iter().map(|(_, cents)| cents).sum();
        let mut expense = Expense::new(
            group,
            payer.into(),
            "test".to_string(),
            MoneyCents::new(total),
            SplitPolicy::Exact,
            Utc::now(),
        )
        .unwrap();
        expense.splits = shares
            .iter()
            .map(|(name, cents)| Split {
                expense_id: expense.id,
                participant_id: (*name).into(),
                amount_owed: MoneyCents::new(*cents),
            })
            .collect();
        expense.into()
    }

    fn settlement(group: GroupId, payer: &str, payee: &str, cents: i64) -> LedgerEvent {
        Settlement::new(group, payer.into(), payee.into(), MoneyCents::new(cents), Utc::now())
            .unwrap()
            .into()
    }

    #[test]
    fn participant_with_debt_is_not_settled() {
        let group = GroupId::new_v4();
        let events = vec![exact_expense(group, "alice", &[("alice", 10_00), ("bob", 10_00)])];
        assert!(!is_participant_settled(&events, &"bob".into()).unwrap());
        assert!(!is_participant_settled(&events, &"alice".into()).unwrap());
        assert!(is_participant_settled(&events, &"charlie".into()).unwrap());
    }

    #[test]
    fn participant_is_settled_after_repayment() {
        let group = GroupId::new_v4();
        let events = vec![
            exact_expense(group, "alice", &[("alice", 10_00), ("bob", 10_00)]),
            settlement(group, "bob", "alice", 10_00),
        ];
        assert!(is_participant_settled(&events, &"bob".into()).unwrap());
        assert!(check_settled(&events, &SettlementScope::Group).unwrap());
    }

    #[test]
    fn group_check_tolerates_ten_cents() {
        let group = GroupId::new_v4();
        let within = vec![exact_expense(group, "alice", &[("alice", 10_00), ("bob", 0_10)])];
        assert!(is_group_settled(&within).unwrap());
        assert!(!check_settled(&within, &SettlementScope::Participant("bob".into())).unwrap());

        let beyond = vec![exact_expense(group, "alice", &[("alice", 10_00), ("bob", 0_11)])];
        assert!(!is_group_settled(&beyond).unwrap());
    }

    #[test]
    fn empty_history_is_settled() {
        let events: Vec<LedgerEvent> = Vec::new();
        assert!(is_group_settled(&events).unwrap());
        assert!(is_participant_settled(&events, &"alice".into()).unwrap());
    }
}
