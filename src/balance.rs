use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schemas::{Expense, Member, MemberId};

/// Net position of one accepted member across all expenses.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub user_id: MemberId,
    pub name: String,
    /// What the others owe this member.
    pub owed: f64,
    /// What this member owes the others.
    pub owes: f64,
    pub net_balance: f64,
}

impl Balance {
    fn empty(member: &Member) -> Self {
        Balance {
            user_id: member.id.clone(),
            name: member.name.clone(),
            owed: 0.0,
            owes: 0.0,
            net_balance: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub balances: Vec<Balance>,
    pub total_expenses: f64,
    pub expense_per_person: f64,
}

/// Reduces the roster and expense list into per-member positions.
///
/// Only accepted members get a balance entry, in roster order. Expenses whose
/// payer has no entry, or that have nobody to split with, still count towards
/// the total but move no balance.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> BalanceReport {
    let mut balances: Vec<Balance> = members
        .iter()
        .filter(|member| member.is_accepted())
        .map(Balance::empty)
        .collect();

    let total_expenses: f64 = expenses.iter().map(|expense| expense.amount).sum();

    // The total stays the full sum even with nobody accepted; the web app this
    // replaces reported 0 here.
    if balances.is_empty() {
        return BalanceReport {
            balances,
            total_expenses,
            expense_per_person: 0.0,
        };
    }

    for expense in expenses {
        if expense.split_with.is_empty() {
            debug!(expense = %expense.id, "expense has nobody to split with, skipping");
            continue;
        }
        let Some(payer) = position_of(&balances, &expense.paid_by) else {
            debug!(expense = %expense.id, payer = %expense.paid_by, "payer is not an accepted member, skipping");
            continue;
        };

        let share = expense.amount / expense.split_with.len() as f64;
        balances[payer].owed += expense.amount - share;

        for participant in &expense.split_with {
            if *participant == expense.paid_by {
                continue;
            }
            if let Some(index) = position_of(&balances, participant) {
                balances[index].owes += share;
            }
        }
    }

    for balance in balances.iter_mut() {
        balance.net_balance = balance.owed - balance.owes;
    }

    let expense_per_person = total_expenses / balances.len() as f64;
    BalanceReport {
        balances,
        total_expenses,
        expense_per_person,
    }
}

fn position_of(balances: &[Balance], id: &str) -> Option<usize> {
    balances.iter().position(|balance| balance.user_id == id)
}
