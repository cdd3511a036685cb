//! Input checks applied before anything reaches the ledger.
//!
//! The balance engine itself accepts any representable input; malformed
//! expenses are turned away here instead.

use std::collections::HashSet;

use crate::error::{Result, SplitError};
use crate::schemas::{Expense, Member, NewMember};

pub fn validate_expense(expense: &Expense, roster: &[Member]) -> Result<()> {
    if expense.title.trim().is_empty() {
        return Err(SplitError::Validation("title is required".into()));
    }
    if !expense.amount.is_finite() || expense.amount <= 0.0 {
        return Err(SplitError::Validation(format!(
            "amount must be a positive number, got {}",
            expense.amount
        )));
    }
    // An expense nobody shares would count towards the total without moving any balance
    if expense.split_with.is_empty() {
        return Err(SplitError::EmptySplit);
    }

    let known = |id: &str| roster.iter().any(|member| member.id == id);
    if !known(&expense.paid_by) {
        return Err(SplitError::UnknownMember(expense.paid_by.clone()));
    }

    let mut seen = HashSet::new();
    for participant in &expense.split_with {
        if !known(participant) {
            return Err(SplitError::UnknownMember(participant.clone()));
        }
        if !seen.insert(participant.as_str()) {
            return Err(SplitError::Validation(format!(
                "{participant} appears twice in the split"
            )));
        }
    }
    Ok(())
}

pub fn validate_new_member(member: &NewMember, roster: &[Member]) -> Result<()> {
    if member.name.trim().is_empty() {
        return Err(SplitError::Validation("name is required".into()));
    }
    validate_email(&member.email, roster, None)
}

/// `exclude` is the id of a member allowed to keep their current address.
pub fn validate_email(email: &str, roster: &[Member], exclude: Option<&str>) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(SplitError::Validation("email is required".into()));
    }
    if !looks_like_email(email) {
        return Err(SplitError::Validation(format!("email is invalid: {email}")));
    }
    let taken = roster
        .iter()
        .filter(|member| Some(member.id.as_str()) != exclude)
        .any(|member| member.email == email);
    if taken {
        return Err(SplitError::Validation(format!(
            "email is already in use: {email}"
        )));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
