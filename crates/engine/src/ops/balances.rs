use crate::{
    BalanceSheet, Balances, GroupId, ResultEngine, SettlementScope, balance_sheet, check_settled,
    compute_balances,
};

use super::Engine;

impl Engine {
    /// Net balances of a group, recomputed from its full history.
    pub fn balances(&self, group_id: GroupId) -> ResultEngine<Balances> {
        self.require_group(group_id)?;
        compute_balances(self.events_of(group_id))
    }

    /// Non-zero balances and simplified debts, decorated with names.
    pub fn balance_sheet(&self, group_id: GroupId) -> ResultEngine<BalanceSheet> {
        let balances = self.balances(group_id)?;
        Ok(balance_sheet(&balances, self))
    }

    pub fn check_settled(&self, group_id: GroupId, scope: &SettlementScope) -> ResultEngine<bool> {
        self.require_group(group_id)?;
        if let SettlementScope::Participant(participant) = scope {
            self.require_participant(participant)?;
        }
        check_settled(self.events_of(group_id), scope)
    }
}
