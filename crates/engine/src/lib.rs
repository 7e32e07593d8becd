//! Ledger and settlement engine for shared group expenses.
//!
//! The pure core turns a group's history into answers:
//!
//! - [`allocate_splits`]: share an expense between participants (EQUAL or
//!   EXACT policy).
//! - [`compute_balances`]: fold expenses and settlements into net balances.
//! - [`check_settled`]: the gate used before removing a member or deleting a
//!   group.
//! - [`simplify_debts`]: reduce balances to a short list of payments.
//!
//! [`Engine`] is an in-memory host around the core that owns participants,
//! groups and the append-only event list, and enforces the group rules
//! (administrator permissions, membership, settle-before-delete).

pub use allocation::{EXACT_SUM_TOLERANCE, Share, SplitRequest, allocate, allocate_splits};
pub use balances::{Balances, compute_balances};
pub use directory::{GroupDirectory, ParticipantDirectory};
pub use error::EngineError;
pub use events::{Expense, LedgerEvent, Settlement, Split, SplitPolicy};
pub use gate::{
    GROUP_SETTLED_TOLERANCE, SettlementScope, check_settled, is_group_settled,
    is_participant_settled,
};
pub use groups::Group;
pub use ids::{ExpenseId, GroupId, ParticipantId, SettlementId};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, ExpenseRequest, LedgerSnapshot, SettlementRequest};
pub use participants::{Participant, UNKNOWN_NAME};
pub use sheet::{
    BalanceSheet, HistoryEntry, HistoryKind, MemberBalance, NamedTransfer, SplitDetail,
    balance_sheet,
};
pub use simplify::{SimplifiedTransfer, simplify_debts};

mod allocation;
mod balances;
mod directory;
mod error;
mod events;
mod gate;
mod groups;
mod ids;
mod money;
mod ops;
mod participants;
mod sheet;
mod simplify;

type ResultEngine<T> = Result<T, EngineError>;
