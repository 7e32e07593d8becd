//! Debt simplification.
//!
//! Greedily matches debtors against creditors to produce a short list of
//! point-to-point payments that clears every balance. The result is not
//! guaranteed optimal but never exceeds `debtors + creditors - 1` transfers.

use serde::{Deserialize, Serialize};

use crate::{Balances, MoneyCents, ParticipantId};

/// One suggested payment from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedTransfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: MoneyCents,
}

/// Reduces `balances` to a list of transfers.
///
/// Debtors and creditors are matched in participant-id order (the order of
/// [`Balances`]), so the output is deterministic for a given input.
pub fn simplify_debts(balances: &Balances) -> Vec<SimplifiedTransfer> {
    // Remaining magnitudes, both kept positive.
    let mut debtors: Vec<(&ParticipantId, MoneyCents)> = Vec::new();
    let mut creditors: Vec<(&ParticipantId, MoneyCents)> = Vec::new();
    for (participant, amount) in balances.non_zero() {
        if amount.is_negative() {
            debtors.push((participant, amount.abs()));
        } else {
            creditors.push((participant, amount));
        }
    }

    let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let (debtor, owed) = debtors[d];
        let (creditor, due) = creditors[c];
        let amount = owed.min(due);

        if amount.is_positive() {
            transfers.push(SimplifiedTransfer {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
            });
        }

        debtors[d].1 -= amount;
        creditors[c].1 -= amount;
        if debtors[d].1.is_negligible() {
            d += 1;
        }
        if creditors[c].1.is_negligible() {
            c += 1;
        }
    }

    transfers
}
