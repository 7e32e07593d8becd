//! Mapping between engine values and `api_types` shapes.

use std::collections::BTreeMap;

use api_types::{
    balance,
    expense::ExpenseNew,
    group,
    history::{self, HistoryItem, HistoryType},
    settlement::SettlementNew,
};
use engine::{
    BalanceSheet, Engine, ExpenseRequest, Group, HistoryEntry, HistoryKind, MoneyCents,
    ParticipantDirectory, ParticipantId, SettlementRequest, SplitPolicy, SplitRequest,
};

use crate::error::Result;

pub fn group_response(engine: &Engine, group: &Group) -> group::Group {
    group::Group {
        id: group.id.as_uuid(),
        name: group.name.clone(),
        description: group.description.clone(),
        created_at: group.created_at,
        created_by: group.admin.to_string(),
        members: group
            .members
            .iter()
            .map(|member| group::Member {
                username: member.to_string(),
                name: engine.display_name(member),
            })
            .collect(),
    }
}

pub fn balance_sheet(sheet: BalanceSheet) -> balance::BalanceSheet {
    balance::BalanceSheet {
        balances: sheet
            .balances
            .into_iter()
            .map(|entry| balance::UserBalance {
                username: entry.participant_id.to_string(),
                name: entry.name,
                amount_minor: entry.amount.cents(),
            })
            .collect(),
        simplified_debts: sheet
            .transfers
            .into_iter()
            .map(|transfer| balance::SimplifiedDebt {
                from_user: transfer.from_name,
                to_user: transfer.to_name,
                amount_minor: transfer.amount.cents(),
            })
            .collect(),
    }
}

pub fn history_item(entry: HistoryEntry) -> HistoryItem {
    HistoryItem {
        id: entry.id,
        kind: match entry.kind {
            HistoryKind::Expense => HistoryType::Expense,
            HistoryKind::Settlement => HistoryType::Settlement,
        },
        description: entry.description,
        amount_minor: entry.amount.cents(),
        paid_by_user_name: entry.paid_by_name,
        created_at: entry.created_at,
        splits: entry
            .splits
            .into_iter()
            .map(|split| history::SplitDetail {
                user_name: split.name,
                amount_minor: split.amount_owed.cents(),
            })
            .collect(),
    }
}

/// Builds the engine request; unknown split types are rejected here.
pub fn expense_request(dto: ExpenseNew) -> Result<ExpenseRequest> {
    let split = match SplitPolicy::try_from(dto.split_type.as_str())? {
        SplitPolicy::Equal => SplitRequest::Equal {
            participants: dto
                .involved_users
                .unwrap_or_default()
                .into_iter()
                .map(ParticipantId::from)
                .collect(),
        },
        SplitPolicy::Exact => SplitRequest::Exact {
            amounts: dto
                .exact_splits
                .unwrap_or_default()
                .into_iter()
                .map(|(user, cents)| (ParticipantId::from(user), MoneyCents::new(cents)))
                .collect::<BTreeMap<_, _>>(),
        },
    };

    Ok(ExpenseRequest {
        group_id: dto.group_id.into(),
        payer: dto.paid_by.into(),
        description: dto.description,
        amount: MoneyCents::new(dto.amount_minor),
        split,
    })
}

pub fn settlement_request(dto: SettlementNew) -> SettlementRequest {
    SettlementRequest {
        group_id: dto.group_id.into(),
        payer: dto.payer.into(),
        payee: dto.payee.into(),
        amount: MoneyCents::new(dto.amount_minor),
    }
}

#[cfg(test)]
mod tests {
    use engine::EngineError;
    use uuid::Uuid;

    use super::*;
    use crate::error::AppError;

    fn dto(split_type: &str) -> ExpenseNew {
        ExpenseNew {
            group_id: Uuid::new_v4(),
            paid_by: "alice".to_string(),
            description: "Taxi".to_string(),
            amount_minor: 12_00,
            split_type: split_type.to_string(),
            involved_users: Some(vec!["alice".to_string(), "bob".to_string()]),
            exact_splits: Some(BTreeMap::from([("bob".to_string(), 12_00)])),
        }
    }

    #[test]
    fn split_type_selects_the_matching_field() {
        let equal = expense_request(dto("equal")).unwrap();
        assert_eq!(equal.split.policy(), SplitPolicy::Equal);
        assert_eq!(equal.split.participants().len(), 2);

        let exact = expense_request(dto("EXACT")).unwrap();
        assert_eq!(exact.split.policy(), SplitPolicy::Exact);
        assert_eq!(exact.split.participants(), vec![&ParticipantId::from("bob")]);
    }

    #[test]
    fn unknown_split_type_is_invalid_input() {
        assert!(matches!(
            expense_request(dto("PERCENT")),
            Err(AppError::Engine(EngineError::InvalidInput(_)))
        ));
    }
}
