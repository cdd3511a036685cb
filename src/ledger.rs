use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Datelike, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::balance::{compute_balances, BalanceReport};
use crate::config::HouseholdConfig;
use crate::error::{Result, SplitError};
use crate::reports::{member_summaries, MemberSummary};
use crate::schemas::{
    Expense, ExpensePatch, Household, Member, MemberId, MemberPatch, MemberStatus, NewExpense,
    NewMember,
};
use crate::settlement::{check_balanced, settlement_plan, SettlementPlan};
use crate::validation::{validate_email, validate_expense, validate_new_member};

/// In-memory household state shared by the HTTP handlers.
///
/// Every read of balances or settlements is computed from the current
/// snapshot; nothing derived is cached.
pub struct Ledger {
    self_id: MemberId,
    household: RwLock<Household>,
}

impl Ledger {
    /// Starts a household containing only the acting member, already accepted.
    pub fn new(owner: &HouseholdConfig) -> Self {
        let me = Member {
            id: owner.self_id.clone(),
            name: owner.self_name.clone(),
            email: owner.self_email.clone(),
            joined_at: Utc::now(),
            status: MemberStatus::Accepted,
            invited_by: owner.self_id.clone(),
        };
        Ledger {
            self_id: owner.self_id.clone(),
            household: RwLock::new(Household {
                members: vec![me],
                expenses: Vec::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Household>> {
        self.household.read().map_err(|_| SplitError::StatePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Household>> {
        self.household.write().map_err(|_| SplitError::StatePoisoned)
    }

    pub fn members(&self) -> Result<Vec<Member>> {
        Ok(self.read()?.members.clone())
    }

    pub fn add_member(&self, new_member: NewMember) -> Result<Member> {
        let mut household = self.write()?;
        validate_new_member(&new_member, &household.members)?;

        let member = Member {
            id: Uuid::new_v4().to_string(),
            name: new_member.name.trim().to_string(),
            email: new_member.email.trim().to_string(),
            joined_at: Utc::now(),
            status: MemberStatus::Pending,
            invited_by: self.self_id.clone(),
        };
        info!(member = %member.id, "invited member");
        household.members.push(member.clone());
        Ok(member)
    }

    pub fn update_member(&self, id: &str, patch: MemberPatch) -> Result<Member> {
        let mut household = self.write()?;
        if !household.members.iter().any(|member| member.id == id) {
            return Err(SplitError::MemberNotFound(id.to_string()));
        }
        if let Some(email) = &patch.email {
            validate_email(email, &household.members, Some(id))?;
        }
        let member = member_mut(&mut household, id)?;
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(SplitError::Validation("name is required".into()));
            }
            member.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            member.email = email.trim().to_string();
        }
        Ok(member.clone())
    }

    pub fn remove_member(&self, id: &str) -> Result<()> {
        if id == self.self_id {
            return Err(SplitError::CannotRemoveSelf(id.to_string()));
        }
        let mut household = self.write()?;
        if !household.members.iter().any(|member| member.id == id) {
            return Err(SplitError::MemberNotFound(id.to_string()));
        }
        // Dropping a referenced member would strand their shares and unbalance the household
        let referenced = household
            .expenses
            .iter()
            .filter(|expense| {
                expense.paid_by == id || expense.split_with.iter().any(|member| member == id)
            })
            .count();
        if referenced > 0 {
            return Err(SplitError::MemberInUse {
                id: id.to_string(),
                expenses: referenced,
            });
        }
        household.members.retain(|member| member.id != id);
        info!(member = %id, "removed member");
        Ok(())
    }

    pub fn accept_invitation(&self, id: &str) -> Result<Member> {
        self.set_status(id, MemberStatus::Accepted)
    }

    pub fn reject_invitation(&self, id: &str) -> Result<Member> {
        self.set_status(id, MemberStatus::Rejected)
    }

    fn set_status(&self, id: &str, status: MemberStatus) -> Result<Member> {
        let mut household = self.write()?;
        let member = member_mut(&mut household, id)?;
        member.status = status;
        info!(member = %id, ?status, "membership status changed");
        Ok(member.clone())
    }

    /// Expenses paid by an accepted member or by the acting member.
    pub fn visible_expenses(&self) -> Result<Vec<Expense>> {
        let household = self.read()?;
        Ok(visible(&household, &self.self_id))
    }

    pub fn add_expense(&self, new_expense: NewExpense) -> Result<Expense> {
        let mut household = self.write()?;
        let expense = new_expense.into_expense(Uuid::new_v4().to_string());
        validate_expense(&expense, &household.members)?;

        info!(
            expense = %expense.id,
            amount = expense.amount,
            payer = %expense.paid_by,
            "recorded expense"
        );
        household.expenses.push(expense.clone());
        Ok(expense)
    }

    pub fn update_expense(&self, id: &str, patch: ExpensePatch) -> Result<Expense> {
        let mut household = self.write()?;
        let index = household
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| SplitError::ExpenseNotFound(id.to_string()))?;

        let patched = patch.applied_to(&household.expenses[index]);
        validate_expense(&patched, &household.members)?;
        household.expenses[index] = patched.clone();
        Ok(patched)
    }

    pub fn delete_expense(&self, id: &str) -> Result<()> {
        let mut household = self.write()?;
        let before = household.expenses.len();
        household.expenses.retain(|expense| expense.id != id);
        if household.expenses.len() == before {
            return Err(SplitError::ExpenseNotFound(id.to_string()));
        }
        Ok(())
    }

    /// `month` is 1-based.
    pub fn expenses_by_month(&self, month: u32, year: i32) -> Result<Vec<Expense>> {
        Ok(self
            .visible_expenses()?
            .into_iter()
            .filter(|expense| expense.date.month() == month && expense.date.year() == year)
            .collect())
    }

    pub fn expenses_by_user(&self, id: &str) -> Result<Vec<Expense>> {
        Ok(self
            .visible_expenses()?
            .into_iter()
            .filter(|expense| expense.paid_by == id)
            .collect())
    }

    pub fn balance_report(&self) -> Result<BalanceReport> {
        let household = self.read()?;
        let expenses = visible(&household, &self.self_id);
        Ok(compute_balances(&household.members, &expenses))
    }

    /// Paid/owes/net per roster member, all read under one lock.
    pub fn member_summaries(&self) -> Result<Vec<MemberSummary>> {
        let household = self.read()?;
        let expenses = visible(&household, &self.self_id);
        let report = compute_balances(&household.members, &expenses);
        Ok(member_summaries(&household.members, &expenses, &report))
    }

    pub fn settlement_plan(&self) -> Result<SettlementPlan> {
        let report = self.balance_report()?;
        if let Err(err) = check_balanced(&report.balances) {
            warn!(%err, "settling an unbalanced household, the residual will not be transferred");
        }
        Ok(settlement_plan(&report.balances))
    }
}

fn visible(household: &Household, self_id: &str) -> Vec<Expense> {
    household
        .expenses
        .iter()
        .filter(|expense| {
            expense.paid_by == self_id
                || household
                    .members
                    .iter()
                    .any(|member| member.is_accepted() && member.id == expense.paid_by)
        })
        .cloned()
        .collect()
}

fn member_mut<'a>(household: &'a mut Household, id: &str) -> Result<&'a mut Member> {
    household
        .members
        .iter_mut()
        .find(|member| member.id == id)
        .ok_or_else(|| SplitError::MemberNotFound(id.to_string()))
}
