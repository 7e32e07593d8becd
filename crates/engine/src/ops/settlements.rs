use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    GroupId, LedgerEvent, MoneyCents, ParticipantId, ResultEngine, Settlement, SettlementId,
};

use super::Engine;

/// A direct repayment between two participants of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub group_id: GroupId,
    pub payer: ParticipantId,
    pub payee: ParticipantId,
    pub amount: MoneyCents,
}

impl Engine {
    /// Records a settlement. Payer and payee only need to exist: a former
    /// member can still pay back what they owe.
    pub fn record_settlement(
        &mut self,
        request: SettlementRequest,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<SettlementId> {
        self.require_group(request.group_id)?;
        self.require_participant(&request.payer)?;
        self.require_participant(&request.payee)?;

        let settlement = Settlement::new(
            request.group_id,
            request.payer,
            request.payee,
            request.amount,
            created_at,
        )?;
        let settlement_id = settlement.id;
        self.append(LedgerEvent::Settlement(settlement))?;
        Ok(settlement_id)
    }
}
