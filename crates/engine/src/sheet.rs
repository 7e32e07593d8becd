//! Presentation-ready views over balances and history.
//!
//! Ids stay the source of truth; names come from a [`ParticipantDirectory`]
//! and are attached at the very end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Balances, MoneyCents, ParticipantDirectory, ParticipantId, simplify_debts};

/// A non-zero net balance with the participant's display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub participant_id: ParticipantId,
    pub name: String,
    pub amount: MoneyCents,
}

/// A suggested transfer with display names for both sides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTransfer {
    pub from: ParticipantId,
    pub from_name: String,
    pub to: ParticipantId,
    pub to_name: String,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub balances: Vec<MemberBalance>,
    pub transfers: Vec<NamedTransfer>,
}

/// Builds the balance sheet: settled participants are left out, debts are
/// simplified from the raw balances.
pub fn balance_sheet(balances: &Balances, directory: &impl ParticipantDirectory) -> BalanceSheet {
    let member_balances = balances
        .non_zero()
        .map(|(participant_id, amount)| MemberBalance {
            participant_id: participant_id.clone(),
            name: directory.display_name(participant_id),
            amount,
        })
        .collect();

    let transfers = simplify_debts(balances)
        .into_iter()
        .map(|transfer| NamedTransfer {
            from_name: directory.display_name(&transfer.from),
            to_name: directory.display_name(&transfer.to),
            from: transfer.from,
            to: transfer.to,
            amount: transfer.amount,
        })
        .collect();

    BalanceSheet {
        balances: member_balances,
        transfers,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryKind {
    Expense,
    Settlement,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDetail {
    pub name: String,
    pub amount_owed: MoneyCents,
}

/// One line of a group's activity feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub kind: HistoryKind,
    pub description: String,
    pub amount: MoneyCents,
    pub paid_by_name: String,
    pub created_at: DateTime<Utc>,
    /// Empty for settlements.
    pub splits: Vec<SplitDetail>,
}
