//! Net balances.
//!
//! Balances are never stored: [`compute_balances`] folds a group's whole
//! history into a fresh map every time. Amounts are integer cents, so the
//! result does not depend on event order; a history whose balances leave the
//! `i64` range is rejected instead of wrapping.

use std::collections::BTreeMap;

use crate::{EngineError, LedgerEvent, MoneyCents, ParticipantId, ResultEngine};

/// Signed net position per participant (positive = owed money by the group).
///
/// Backed by a `BTreeMap`, so iteration is ordered by participant id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    entries: BTreeMap<ParticipantId, MoneyCents>,
}

impl Balances {
    /// Balance of `participant`; participants without events are at zero.
    pub fn get(&self, participant: &ParticipantId) -> MoneyCents {
        self.entries
            .get(participant)
            .copied()
            .unwrap_or(MoneyCents::ZERO)
    }

    /// Every participant touched by the history, including zero balances.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, MoneyCents)> {
        self.entries.iter().map(|(id, amount)| (id, *amount))
    }

    /// Only the balances that are not settled.
    pub fn non_zero(&self) -> impl Iterator<Item = (&ParticipantId, MoneyCents)> {
        self.iter().filter(|(_, amount)| !amount.is_negligible())
    }

    /// Sum across all participants. Zero for any consistent history.
    pub fn total(&self) -> Option<MoneyCents> {
        MoneyCents::checked_sum(self.entries.values().copied())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn credit(&mut self, participant: &ParticipantId, amount: MoneyCents) -> ResultEngine<()> {
        let entry = self
            .entries
            .entry(participant.clone())
            .or_insert(MoneyCents::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| overflow(participant))?;
        Ok(())
    }

    fn debit(&mut self, participant: &ParticipantId, amount: MoneyCents) -> ResultEngine<()> {
        let entry = self
            .entries
            .entry(participant.clone())
            .or_insert(MoneyCents::ZERO);
        *entry = entry
            .checked_sub(amount)
            .ok_or_else(|| overflow(participant))?;
        Ok(())
    }
}

fn overflow(participant: &ParticipantId) -> EngineError {
    EngineError::InvalidInput(format!("balance of {participant} is out of range"))
}

/// One entry per participant; a repeated participant keeps the last amount.
impl FromIterator<(ParticipantId, MoneyCents)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, MoneyCents)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Folds `events` into per-participant net balances.
///
/// - Expense: the payer is credited the full amount, every split participant
///   (payer included) is debited their share.
/// - Settlement: the payer is credited, the payee debited.
///
/// Fails with [`EngineError::InvalidInput`] if a balance overflows.
pub fn compute_balances<'a>(
    events: impl IntoIterator<Item = &'a LedgerEvent>,
) -> ResultEngine<Balances> {
    events
        .into_iter()
        .try_fold(Balances::default(), |mut balances, event| {
            match event {
                LedgerEvent::Expense(expense) => {
                    balances.credit(&expense.payer, expense.amount)?;
                    for split in &expense.splits {
                        balances.debit(&split.participant_id, split.amount_owed)?;
                    }
                }
                LedgerEvent::Settlement(settlement) => {
                    balances.credit(&settlement.payer, settlement.amount)?;
                    balances.debit(&settlement.payee, settlement.amount)?;
                }
            }
            Ok(balances)
        })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;
    use crate::{Expense, GroupId, Settlement, SplitPolicy, SplitRequest, allocate_splits};

    fn equal_expense(group: GroupId, payer: &str, cents: i64, with: &[&str]) -> LedgerEvent {
        let participants: Vec<ParticipantId> = with.iter().map(|name| (*name).into()).collect();
        let members: BTreeSet<ParticipantId> = participants.iter().cloned().collect();
        let mut expense = Expense::new(
            group,
            payer.into(),
            "test".to_string(),
            MoneyCents::new(cents),
            SplitPolicy::Equal,
            Utc::now(),
        )
        .unwrap();
        expense.splits = allocate_splits(
            expense.id,
            expense.amount,
            &SplitRequest::Equal { participants },
            &members,
        )
        .unwrap();
        expense.into()
    }

    #[test]
    fn payer_share_nets_against_credit() {
        let group = GroupId::new_v4();
        let events = vec![equal_expense(group, "alice", 100_00, &["alice", "bob", "charlie"])];
        let balances = compute_balances(&events).unwrap();

        assert_eq!(balances.get(&"alice".into()), MoneyCents::new(66_66));
        assert_eq!(balances.get(&"bob".into()), MoneyCents::new(-33_33));
        assert_eq!(balances.get(&"charlie".into()), MoneyCents::new(-33_33));
        assert_eq!(balances.total(), Some(MoneyCents::ZERO));
    }

    #[test]
    fn settlements_move_balances_toward_zero() {
        let group = GroupId::new_v4();
        let events = vec![
            equal_expense(group, "alice", 60_00, &["alice", "bob"]),
            Settlement::new(group, "bob".into(), "alice".into(), MoneyCents::new(30_00), Utc::now())
                .unwrap()
                .into(),
        ];
        let balances = compute_balances(&events).unwrap();

        assert!(balances.get(&"alice".into()).is_zero());
        assert!(balances.get(&"bob".into()).is_zero());
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.non_zero().count(), 0);
    }

    #[test]
    fn unknown_participant_is_zero() {
        let balances = compute_balances(&Vec::<LedgerEvent>::new()).unwrap();
        assert!(balances.is_empty());
        assert_eq!(balances.get(&"nobody".into()), MoneyCents::ZERO);
    }

    #[test]
    fn order_does_not_matter() {
        let group = GroupId::new_v4();
        let mut events = vec![
            equal_expense(group, "alice", 100_00, &["alice", "bob", "charlie"]),
            equal_expense(group, "bob", 10_01, &["charlie", "bob"]),
            Settlement::new(
                group,
                "charlie".into(),
                "alice".into(),
                MoneyCents::new(5_55),
                Utc::now(),
            )
            .unwrap()
            .into(),
        ];
        let forward = compute_balances(&events).unwrap();
        events.reverse();
        assert_eq!(forward, compute_balances(&events).unwrap());
    }

    #[test]
    fn out_of_range_balance_is_an_error() {
        let group = GroupId::new_v4();
        let huge = MoneyCents::new(9_000_000_000_000_000_000);
        let events: Vec<LedgerEvent> = (0..2)
            .map(|_| {
                Settlement::new(group, "alice".into(), "bob".into(), huge, Utc::now())
                    .unwrap()
                    .into()
            })
            .collect();

        assert!(matches!(
            compute_balances(&events),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(compute_balances(&events[..1]).is_ok());
    }
}
