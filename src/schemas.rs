use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type MemberId = String;
pub type ExpenseId = String;

pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Groceries",
    "Rent",
    "Utilities",
    "Internet",
    "Streaming",
    "Household",
    "Entertainment",
    "Transportation",
    "Dining",
    "Other",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
    pub status: MemberStatus,
    pub invited_by: MemberId,
}

impl Member {
    pub fn is_accepted(&self) -> bool {
        self.status == MemberStatus::Accepted
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub paid_by: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub split_with: Vec<MemberId>,
}

/// Snapshot of everything the balance engine reads.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Household {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewMember {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub paid_by: MemberId,
    #[serde(default)]
    pub description: Option<String>,
    pub split_with: Vec<MemberId>,
}

impl NewExpense {
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            title: self.title,
            amount: self.amount,
            category: self.category,
            date: self.date,
            paid_by: self.paid_by,
            description: self.description,
            split_with: self.split_with,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub paid_by: Option<MemberId>,
    pub description: Option<String>,
    pub split_with: Option<Vec<MemberId>>,
}

impl ExpensePatch {
    /// Produces the expense as it would look after the patch, without touching `expense`.
    pub fn applied_to(&self, expense: &Expense) -> Expense {
        let mut patched = expense.clone();
        if let Some(title) = &self.title {
            patched.title = title.clone();
        }
        if let Some(amount) = self.amount {
            patched.amount = amount;
        }
        if let Some(category) = &self.category {
            patched.category = category.clone();
        }
        if let Some(date) = self.date {
            patched.date = date;
        }
        if let Some(paid_by) = &self.paid_by {
            patched.paid_by = paid_by.clone();
        }
        if let Some(description) = &self.description {
            patched.description = Some(description.clone());
        }
        if let Some(split_with) = &self.split_with {
            patched.split_with = split_with.clone();
        }
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_uses_camel_case_on_the_wire() {
        let json = r#"{
            "id": "e1",
            "title": "Pizza",
            "amount": 24.5,
            "category": "Dining",
            "date": "2024-03-02",
            "paidBy": "alice",
            "splitWith": ["alice", "bob"]
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.paid_by, "alice");
        assert_eq!(expense.split_with, vec!["alice", "bob"]);
        assert_eq!(expense.description, None);

        let back = serde_json::to_value(&expense).unwrap();
        assert_eq!(back["paidBy"], "alice");
        assert!(back.get("description").is_none());
    }

    #[test]
    fn member_status_is_lowercase() {
        let status: MemberStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(status, MemberStatus::Accepted);
        assert_eq!(
            serde_json::to_string(&MemberStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let expense = NewExpense {
            title: "Rent".into(),
            amount: 900.0,
            category: "Rent".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            paid_by: "alice".into(),
            description: None,
            split_with: vec!["alice".into(), "bob".into()],
        }
        .into_expense("e1".into());
        let patch = ExpensePatch {
            amount: Some(950.0),
            ..Default::default()
        };
        let patched = patch.applied_to(&expense);
        assert_eq!(patched.amount, 950.0);
        assert_eq!(patched.title, "Rent");
        assert_eq!(patched.split_with, expense.split_with);
    }
}
