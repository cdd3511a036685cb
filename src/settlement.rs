use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::balance::Balance;
use crate::error::{Result, SplitError};
use crate::schemas::MemberId;

/// Below this magnitude a balance counts as settled and a transfer as noise.
pub const SETTLEMENT_TOLERANCE: f64 = 0.01;

/// One step of the settle-up plan: `from` pays `to` the given amount.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub from_id: MemberId,
    pub to_id: MemberId,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SettlementPlan {
    pub transfers: Vec<Transfer>,
    /// Sum of the net balances the plan was built from; zero for a closed household.
    pub residual: f64,
}

#[derive(Clone, Debug)]
struct PersonalBalance<'a> {
    id: &'a str,
    name: &'a str,
    balance: f64,
}

impl<'a> From<&'a Balance> for PersonalBalance<'a> {
    fn from(balance: &'a Balance) -> Self {
        PersonalBalance {
            id: &balance.user_id,
            name: &balance.name,
            balance: balance.net_balance,
        }
    }
}

/// Greedy debt simplification: the largest debtor pays the largest creditor
/// until one side runs out.
///
/// This is a heuristic, it does not always find the fewest transfers. When the
/// balances do not sum to zero the unmatched remainder is dropped; use
/// [`check_balanced`] to detect that case.
pub fn plan_settlement(balances: &[Balance]) -> Vec<Transfer> {
    let mut debtors: Vec<PersonalBalance> = balances
        .iter()
        .filter(|b| b.net_balance <= -SETTLEMENT_TOLERANCE)
        .map(PersonalBalance::from)
        .collect();
    let mut creditors: Vec<PersonalBalance> = balances
        .iter()
        .filter(|b| b.net_balance >= SETTLEMENT_TOLERANCE)
        .map(PersonalBalance::from)
        .collect();

    // Stable sorts, so equal balances keep their input order
    debtors.sort_by(|a, b| a.balance.total_cmp(&b.balance));
    creditors.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let amount = debtor.balance.abs().min(creditor.balance);
        if amount > SETTLEMENT_TOLERANCE {
            transfers.push(Transfer {
                from: debtor.name.to_string(),
                to: creditor.name.to_string(),
                from_id: debtor.id.to_string(),
                to_id: creditor.id.to_string(),
                amount: round_to_2_decimals(amount),
            });
        } else {
            debug!(from = debtor.id, to = creditor.id, amount, "dropping sub-cent transfer");
        }

        debtor.balance += amount;
        creditor.balance -= amount;

        if debtor.balance.abs() < SETTLEMENT_TOLERANCE {
            i += 1;
        }
        if creditor.balance < SETTLEMENT_TOLERANCE {
            j += 1;
        }
    }

    if i < debtors.len() || j < creditors.len() {
        warn!(
            unmatched_debtors = debtors.len() - i,
            unmatched_creditors = creditors.len() - j,
            "settlement left balances unmatched"
        );
    }

    transfers
}

/// Signed sum of all net balances.
pub fn residual(balances: &[Balance]) -> f64 {
    balances.iter().map(|b| b.net_balance).sum()
}

pub fn check_balanced(balances: &[Balance]) -> Result<()> {
    let residual = residual(balances);
    if residual.abs() >= SETTLEMENT_TOLERANCE {
        return Err(SplitError::Unbalanced { residual });
    }
    Ok(())
}

pub fn settlement_plan(balances: &[Balance]) -> SettlementPlan {
    SettlementPlan {
        transfers: plan_settlement(balances),
        residual: round_to_2_decimals(residual(balances)),
    }
}

pub fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
