use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod participant {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantNew {
        /// Username; used as the participant id.
        pub username: String,
        pub name: String,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
        pub created_by: String,
        pub members: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Member {
        pub username: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Group {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        /// Username of the administrator.
        pub created_by: String,
        pub members: Vec<Member>,
    }
}

pub mod expense {
    use std::collections::BTreeMap;

    use super::*;

    /// Request to record an expense.
    ///
    /// `split_type` is `EQUAL` (uses `involved_users`, first user absorbs the
    /// rounding remainder) or `EXACT` (uses `exact_splits`, amounts in
    /// cents).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub group_id: Uuid,
        pub paid_by: String,
        pub description: String,
        pub amount_minor: i64,
        pub split_type: String,
        #[serde(default)]
        pub involved_users: Option<Vec<String>>,
        #[serde(default)]
        pub exact_splits: Option<BTreeMap<String, i64>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Created {
        pub id: Uuid,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementNew {
        pub group_id: Uuid,
        pub payer: String,
        pub payee: String,
        pub amount_minor: i64,
    }
}

pub mod balance {
    use super::*;

    /// Net position of a member; positive = owed to them, negative = they owe.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserBalance {
        pub username: String,
        pub name: String,
        pub amount_minor: i64,
    }

    /// Suggested payment: `from_user` pays `to_user`.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SimplifiedDebt {
        pub from_user: String,
        pub to_user: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceSheet {
        pub balances: Vec<UserBalance>,
        pub simplified_debts: Vec<SimplifiedDebt>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettledCheck {
        pub group_id: Uuid,
        /// `None` when the whole group was checked.
        pub username: Option<String>,
        pub settled: bool,
    }
}

pub mod history {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum HistoryType {
        Expense,
        Settlement,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitDetail {
        pub user_name: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryItem {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: HistoryType,
        pub description: String,
        pub amount_minor: i64,
        pub paid_by_user_name: String,
        pub created_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub splits: Vec<SplitDetail>,
    }
}
