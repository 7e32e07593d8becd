//! Split allocation.
//!
//! Turns an expense total and a [`SplitRequest`] into per-participant shares.
//! Both policies conserve the total: EQUAL hands the rounding dust to the
//! first listed participant, EXACT only accepts amounts that already add up
//! (within one cent).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ExpenseId, MoneyCents, ParticipantId, ResultEngine, Split, SplitPolicy};

/// Maximum accepted difference between an EXACT split's sum and the total.
pub const EXACT_SUM_TOLERANCE: MoneyCents = MoneyCents::CENT;

/// Who shares an expense and how.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "UPPERCASE")]
pub enum SplitRequest {
    /// Ordered list of participants; the first one absorbs the remainder.
    Equal { participants: Vec<ParticipantId> },
    /// Explicit amount per participant.
    Exact {
        amounts: BTreeMap<ParticipantId, MoneyCents>,
    },
}

impl SplitRequest {
    pub fn policy(&self) -> SplitPolicy {
        match self {
            Self::Equal { .. } => SplitPolicy::Equal,
            Self::Exact { .. } => SplitPolicy::Exact,
        }
    }

    /// Participants named by the request, in request order.
    pub fn participants(&self) -> Vec<&ParticipantId> {
        match self {
            Self::Equal { participants } => participants.iter().collect(),
            Self::Exact { amounts } => amounts.keys().collect(),
        }
    }
}

/// One participant's allocated share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub participant_id: ParticipantId,
    pub amount: MoneyCents,
}

/// Allocates `total` according to `request`, without membership checks.
pub fn allocate(total: MoneyCents, request: &SplitRequest) -> ResultEngine<Vec<Share>> {
    match request {
        SplitRequest::Equal { participants } => allocate_equal(total, participants),
        SplitRequest::Exact { amounts } => allocate_exact(total, amounts),
    }
}

/// Allocates an expense's splits, requiring every participant to be one of
/// `members`.
///
/// Fails with [`EngineError::InvalidInput`] naming the non-members; nothing is
/// produced in that case.
pub fn allocate_splits(
    expense_id: ExpenseId,
    total: MoneyCents,
    request: &SplitRequest,
    members: &BTreeSet<ParticipantId>,
) -> ResultEngine<Vec<Split>> {
    ensure_members(request.participants(), members)?;
    let shares = allocate(total, request)?;
    Ok(shares
        .into_iter()
        .map(|share| Split {
            expense_id,
            participant_id: share.participant_id,
            amount_owed: share.amount,
        })
        .collect())
}

/// Fails if any of `participants` is not in `members`.
pub(crate) fn ensure_members<'a>(
    participants: impl IntoIterator<Item = &'a ParticipantId>,
    members: &BTreeSet<ParticipantId>,
) -> ResultEngine<()> {
    let outsiders: BTreeSet<&ParticipantId> = participants
        .into_iter()
        .filter(|id| !members.contains(*id))
        .collect();
    if outsiders.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = outsiders.iter().map(|id| id.as_str()).collect();
    Err(EngineError::InvalidInput(format!(
        "the following participants are not members of this group: [{}]",
        names.join(", ")
    )))
}

fn allocate_equal(total: MoneyCents, participants: &[ParticipantId]) -> ResultEngine<Vec<Share>> {
    if participants.is_empty() {
        return Err(EngineError::InvalidInput(
            "no participants selected for split".to_string(),
        ));
    }
    let count = i64::try_from(participants.len())
        .map_err(|_| EngineError::InvalidInput("too many participants".to_string()))?;

    // Round the per-head share down to the cent; whatever is left over goes
    // to the first participant so the shares add up to the total.
    let base = MoneyCents::new(total.cents().div_euclid(count));
    let distributed = base
        .checked_mul(count)
        .ok_or_else(|| EngineError::InvalidInput("amount too large".to_string()))?;
    let remainder = total - distributed;

    Ok(participants
        .iter()
        .enumerate()
        .map(|(idx, participant_id)| Share {
            participant_id: participant_id.clone(),
            amount: if idx == 0 { base + remainder } else { base },
        })
        .collect())
}

fn allocate_exact(
    total: MoneyCents,
    amounts: &BTreeMap<ParticipantId, MoneyCents>,
) -> ResultEngine<Vec<Share>> {
    if amounts.is_empty() {
        return Err(EngineError::InvalidInput(
            "no split amounts provided".to_string(),
        ));
    }
    if let Some((participant_id, _)) = amounts.iter().find(|(_, amount)| amount.is_negative()) {
        return Err(EngineError::InvalidInput(format!(
            "split amount for {participant_id} must be >= 0"
        )));
    }

    let sum = MoneyCents::checked_sum(amounts.values().copied())
        .ok_or_else(|| EngineError::InvalidInput("split amounts are too large".to_string()))?;
    if !sum.is_within(total, EXACT_SUM_TOLERANCE) {
        return Err(EngineError::InvalidInput(format!(
            "split amounts sum to {sum}, expected {total}"
        )));
    }

    Ok(amounts
        .iter()
        .map(|(participant_id, amount)| Share {
            participant_id: participant_id.clone(),
            amount: *amount,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|name| ParticipantId::from(*name)).collect()
    }

    fn amounts(shares: &[Share]) -> Vec<i64> {
        shares.iter().map(|share| share.amount.cents()).collect()
    }

    #[test]
    fn equal_split_gives_remainder_to_first_participant() {
        let request = SplitRequest::Equal {
            participants: ids(&["alice", "bob", "charlie"]),
        };
        let shares = allocate(MoneyCents::new(100_00), &request).unwrap();
        assert_eq!(amounts(&shares), vec![33_34, 33_33, 33_33]);
        assert_eq!(shares[0].participant_id, ParticipantId::from("alice"));
    }

    #[test]
    fn equal_split_follows_input_order() {
        let request = SplitRequest::Equal {
            participants: ids(&["charlie", "alice", "bob"]),
        };
        let shares = allocate(MoneyCents::new(10_00), &request).unwrap();
        assert_eq!(shares[0].participant_id, ParticipantId::from("charlie"));
        assert_eq!(amounts(&shares), vec![3_34, 3_33, 3_33]);
    }

    #[test]
    fn equal_split_without_participants_is_rejected() {
        let request = SplitRequest::Equal {
            participants: Vec::new(),
        };
        assert!(matches!(
            allocate(MoneyCents::new(1_00), &request),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn exact_split_accepts_one_cent_boundary() {
        let request = SplitRequest::Exact {
            amounts: BTreeMap::from([
                ("alice".into(), MoneyCents::new(50_00)),
                ("bob".into(), MoneyCents::new(50_01)),
            ]),
        };
        let shares = allocate(MoneyCents::new(100_00), &request).unwrap();
        assert_eq!(amounts(&shares), vec![50_00, 50_01]);
    }

    #[test]
    fn exact_split_rejects_sum_mismatch() {
        let request = SplitRequest::Exact {
            amounts: BTreeMap::from([
                ("alice".into(), MoneyCents::new(50_00)),
                ("bob".into(), MoneyCents::new(50_02)),
            ]),
        };
        assert!(matches!(
            allocate(MoneyCents::new(100_00), &request),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn exact_split_rejects_shares_that_overflow() {
        let huge = MoneyCents::new(9_000_000_000_000_000_000);
        let request = SplitRequest::Exact {
            amounts: BTreeMap::from([("alice".into(), huge), ("bob".into(), huge)]),
        };
        assert_eq!(
            allocate(huge, &request),
            Err(EngineError::InvalidInput(
                "split amounts are too large".to_string()
            ))
        );
    }

    #[test]
    fn exact_split_rejects_empty_and_negative_amounts() {
        let empty = SplitRequest::Exact {
            amounts: BTreeMap::new(),
        };
        assert!(allocate(MoneyCents::new(1_00), &empty).is_err());

        let negative = SplitRequest::Exact {
            amounts: BTreeMap::from([
                ("alice".into(), MoneyCents::new(2_00)),
                ("bob".into(), MoneyCents::new(-1_00)),
            ]),
        };
        assert!(allocate(MoneyCents::new(1_00), &negative).is_err());
    }

    #[test]
    fn splits_require_group_membership() {
        let members: BTreeSet<ParticipantId> = ids(&["alice", "bob"]).into_iter().collect();
        let request = SplitRequest::Equal {
            participants: ids(&["alice", "dave", "carol"]),
        };
        let err = allocate_splits(ExpenseId::new_v4(), MoneyCents::new(9_00), &request, &members)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidInput(
                "the following participants are not members of this group: [carol, dave]"
                    .to_string()
            )
        );
    }

    #[test]
    fn splits_reference_their_expense() {
        let members: BTreeSet<ParticipantId> = ids(&["alice", "bob"]).into_iter().collect();
        let expense_id = ExpenseId::new_v4();
        let request = SplitRequest::Equal {
            participants: ids(&["alice", "bob"]),
        };
        let splits =
            allocate_splits(expense_id, MoneyCents::new(10_01), &request, &members).unwrap();
        assert!(splits.iter().all(|split| split.expense_id == expense_id));
        let total = MoneyCents::checked_sum(splits.iter().map(|split| split.amount_owed));
        assert_eq!(total, Some(MoneyCents::new(10_01)));
    }
}
