//! Ledger events.
//!
//! A group's history is an append-only list of [`LedgerEvent`]s: expenses
//! (with the [`Split`]s produced when they were recorded) and direct
//! settlements between two participants. Events are never mutated after
//! creation; balances are always recomputed from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EXACT_SUM_TOLERANCE, EngineError, ExpenseId, GroupId, MoneyCents, ParticipantId,
    ResultEngine, SettlementId,
};

fn ensure_positive(amount: MoneyCents, what: &str) -> ResultEngine<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!("{what} amount must be > 0")))
    }
}

/// How an expense's amount is allocated across participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitPolicy {
    Equal,
    Exact,
}

impl SplitPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::Exact => "EXACT",
        }
    }
}

impl TryFrom<&str> for SplitPolicy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("equal") {
            Ok(Self::Equal)
        } else if value.eq_ignore_ascii_case("exact") {
            Ok(Self::Exact)
        } else {
            Err(EngineError::InvalidInput(format!(
                "invalid split type {value:?}. Use EQUAL or EXACT."
            )))
        }
    }
}

/// One participant's share of a single expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub expense_id: ExpenseId,
    pub participant_id: ParticipantId,
    pub amount_owed: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub payer: ParticipantId,
    pub description: String,
    pub amount: MoneyCents,
    pub policy: SplitPolicy,
    pub created_at: DateTime<Utc>,
    pub splits: Vec<Split>,
}

impl Expense {
    /// Creates an expense header without splits.
    ///
    /// Splits are attached by the allocator; see
    /// [`allocate_splits`](crate::allocate_splits).
    pub fn new(
        group_id: GroupId,
        payer: ParticipantId,
        description: String,
        amount: MoneyCents,
        policy: SplitPolicy,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        ensure_positive(amount, "expense")?;
        Ok(Self {
            id: ExpenseId::new_v4(),
            group_id,
            payer,
            description,
            amount,
            policy,
            created_at,
            splits: Vec::new(),
        })
    }

    /// Sum of the split shares.
    pub fn split_total(&self) -> ResultEngine<MoneyCents> {
        MoneyCents::checked_sum(self.splits.iter().map(|split| split.amount_owed))
            .ok_or_else(|| EngineError::InvalidInput(format!("expense {} overflows", self.id)))
    }

    /// Re-checks what [`Expense::new`] and the allocator guarantee, for
    /// expenses that come from outside (e.g. a deserialized snapshot).
    pub fn validate(&self) -> ResultEngine<()> {
        ensure_positive(self.amount, "expense")?;
        let owned = self
            .splits
            .iter()
            .all(|split| split.expense_id == self.id && !split.amount_owed.is_negative());
        if !owned || !self.split_total()?.is_within(self.amount, EXACT_SUM_TOLERANCE) {
            return Err(EngineError::InvalidInput(format!(
                "expense {} has inconsistent splits",
                self.id
            )));
        }
        Ok(())
    }
}

/// A direct repayment from `payer` to `payee`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub group_id: GroupId,
    pub payer: ParticipantId,
    pub payee: ParticipantId,
    pub amount: MoneyCents,
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    pub fn new(
        group_id: GroupId,
        payer: ParticipantId,
        payee: ParticipantId,
        amount: MoneyCents,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let settlement = Self {
            id: SettlementId::new_v4(),
            group_id,
            payer,
            payee,
            amount,
            created_at,
        };
        settlement.validate()?;
        Ok(settlement)
    }

    pub fn validate(&self) -> ResultEngine<()> {
        ensure_positive(self.amount, "settlement")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Expense(Expense),
    Settlement(Settlement),
}

impl LedgerEvent {
    pub fn group_id(&self) -> GroupId {
        match self {
            Self::Expense(expense) => expense.group_id,
            Self::Settlement(settlement) => settlement.group_id,
        }
    }

    /// Expense and settlement ids share one uuid space.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Expense(expense) => expense.id.as_uuid(),
            Self::Settlement(settlement) => settlement.id.as_uuid(),
        }
    }

    pub fn validate(&self) -> ResultEngine<()> {
        match self {
            Self::Expense(expense) => expense.validate(),
            Self::Settlement(settlement) => settlement.validate(),
        }
    }
}

impl From<Expense> for LedgerEvent {
    fn from(value: Expense) -> Self {
        Self::Expense(value)
    }
}

impl From<Settlement> for LedgerEvent {
    fn from(value: Settlement) -> Self {
        Self::Settlement(value)
    }
}
