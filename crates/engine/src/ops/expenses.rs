use std::iter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Expense, ExpenseId, GroupDirectory, GroupId, HistoryEntry, HistoryKind,
    LedgerEvent, MoneyCents, ParticipantDirectory, ParticipantId, ResultEngine, SplitDetail,
    SplitRequest, allocate_splits, allocation::ensure_members,
};

use super::{Engine, normalize_required_name};

/// Everything needed to record an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRequest {
    pub group_id: GroupId,
    pub payer: ParticipantId,
    pub description: String,
    pub amount: MoneyCents,
    pub split: SplitRequest,
}

impl Engine {
    /// Records an expense and its splits as one unit.
    ///
    /// The payer and every split participant must be current members of the
    /// group. Nothing is stored if any check fails.
    pub fn record_expense(
        &mut self,
        request: ExpenseRequest,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<ExpenseId> {
        let ExpenseRequest {
            group_id,
            payer,
            description,
            amount,
            split,
        } = request;

        let members = self.members_of(group_id)?;
        self.require_participant(&payer)?;
        ensure_members(
            iter::once(&payer).chain(split.participants()),
            &members,
        )?;

        let description = normalize_required_name(&description, "expense")?;
        let mut expense = Expense::new(
            group_id,
            payer,
            description,
            amount,
            split.policy(),
            created_at,
        )?;
        expense.splits = allocate_splits(expense.id, amount, &split, &members)?;

        let expense_id = expense.id;
        self.append(LedgerEvent::Expense(expense))?;
        Ok(expense_id)
    }

    pub fn expense(&self, expense_id: ExpenseId) -> ResultEngine<&Expense> {
        self.events
            .iter()
            .find_map(|event| match event {
                LedgerEvent::Expense(expense) if expense.id == expense_id => Some(expense),
                _ => None,
            })
            .ok_or_else(|| EngineError::NotFound(format!("expense {expense_id}")))
    }

    /// Expenses and settlements of a group, newest first.
    pub fn group_history(&self, group_id: GroupId) -> ResultEngine<Vec<HistoryEntry>> {
        self.require_group(group_id)?;

        let mut history: Vec<HistoryEntry> = self
            .events_of(group_id)
            .map(|event| match event {
                LedgerEvent::Expense(expense) => HistoryEntry {
                    id: expense.id.as_uuid(),
                    kind: HistoryKind::Expense,
                    description: expense.description.clone(),
                    amount: expense.amount,
                    paid_by_name: self.display_name(&expense.payer),
                    created_at: expense.created_at,
                    splits: expense
                        .splits
                        .iter()
                        .map(|split| SplitDetail {
                            name: self.display_name(&split.participant_id),
                            amount_owed: split.amount_owed,
                        })
                        .collect(),
                },
                LedgerEvent::Settlement(settlement) => {
                    let payer = self.display_name(&settlement.payer);
                    let payee = self.display_name(&settlement.payee);
                    HistoryEntry {
                        id: settlement.id.as_uuid(),
                        kind: HistoryKind::Settlement,
                        description: format!("{payer} paid {payee}"),
                        amount: settlement.amount,
                        paid_by_name: payer,
                        created_at: settlement.created_at,
                        splits: Vec::new(),
                    }
                }
            })
            .collect();

        // Stable sort: same-instant events keep their append order.
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(history)
    }
}
