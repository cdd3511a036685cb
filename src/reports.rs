use serde::{Deserialize, Serialize};

use crate::balance::BalanceReport;
use crate::schemas::{Expense, Member};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub name: String,
    pub paid: f64,
    pub owes: f64,
    pub net_balance: f64,
}

/// Totals per category, in the order categories first appear.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|total| total.name == expense.category) {
            Some(total) => total.value += expense.amount,
            None => totals.push(CategoryTotal {
                name: expense.category.clone(),
                value: expense.amount,
            }),
        }
    }
    totals
}

/// What each roster member paid, next to their position in `report`.
pub fn member_summaries(
    members: &[Member],
    expenses: &[Expense],
    report: &BalanceReport,
) -> Vec<MemberSummary> {
    members
        .iter()
        .map(|member| {
            let paid = expenses
                .iter()
                .filter(|expense| expense.paid_by == member.id)
                .map(|expense| expense.amount)
                .sum();
            let balance = report.balances.iter().find(|b| b.user_id == member.id);
            MemberSummary {
                name: member.name.clone(),
                paid,
                owes: balance.map_or(0.0, |b| b.owes),
                net_balance: balance.map_or(0.0, |b| b.net_balance),
            }
        })
        .collect()
}

/// Narrowing applied to the expense listing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ExpenseFilter {
    /// Case-insensitive match against title, description and category.
    pub search: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
}

impl ExpenseFilter {
    fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if expense.category != *category {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                expense.title.to_lowercase().contains(&term)
                    || expense
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
                    || expense.category.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Expenses passing `filter`, newest date first.
pub fn filter_expenses(expenses: Vec<Expense>, filter: &ExpenseFilter) -> Vec<Expense> {
    let mut matching: Vec<Expense> = expenses
        .into_iter()
        .filter(|expense| filter.matches(expense))
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}

pub fn recent_expenses(expenses: &[Expense], limit: usize) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::compute_balances;
    use crate::schemas::MemberStatus;
    use chrono::{NaiveDate, Utc};

    fn expense(id: &str, amount: f64, category: &str, day: u32, payer: &str) -> Expense {
        Expense {
            id: id.into(),
            title: id.into(),
            amount,
            category: category.into(),
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            paid_by: payer.into(),
            description: None,
            split_with: vec!["a".into(), "b".into()],
        }
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let expenses = vec![
            expense("1", 10.0, "Rent", 1, "a"),
            expense("2", 5.0, "Dining", 2, "a"),
            expense("3", 15.0, "Rent", 3, "b"),
        ];
        assert_eq!(
            category_totals(&expenses),
            vec![
                CategoryTotal {
                    name: "Rent".into(),
                    value: 25.0,
                },
                CategoryTotal {
                    name: "Dining".into(),
                    value: 5.0,
                },
            ]
        );
    }

    #[test]
    fn summaries_cover_the_whole_roster() {
        let member = |id: &str, status| Member {
            id: id.into(),
            name: id.to_uppercase(),
            email: format!("{id}@x.io"),
            joined_at: Utc::now(),
            status,
            invited_by: "a".into(),
        };
        let members = vec![
            member("a", MemberStatus::Accepted),
            member("b", MemberStatus::Accepted),
            member("p", MemberStatus::Pending),
        ];
        let expenses = vec![expense("1", 20.0, "Rent", 1, "a")];
        let report = compute_balances(&members, &expenses);

        let summaries = member_summaries(&members, &expenses, &report);
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].paid, 20.0);
        assert_eq!(summaries[0].net_balance, 10.0);
        assert_eq!(summaries[1].owes, 10.0);
        assert_eq!(summaries[2].paid, 0.0);
        assert_eq!(summaries[2].net_balance, 0.0);
    }

    #[test]
    fn filter_searches_text_fields_case_insensitively() {
        let mut described = expense("2", 8.0, "Household", 2, "a");
        described.description = Some("Dish SOAP and sponges".into());
        let expenses = vec![
            expense("Netflix", 12.0, "Streaming", 1, "a"),
            described,
            expense("3", 30.0, "Groceries", 3, "b"),
        ];

        let by_term = |term: &str| {
            let filter = ExpenseFilter {
                search: Some(term.into()),
                category: None,
            };
            filter_expenses(expenses.clone(), &filter)
                .into_iter()
                .map(|e| e.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(by_term("netFLIX"), vec!["Netflix"]);
        assert_eq!(by_term("soap"), vec!["2"]);
        assert_eq!(by_term("grocer"), vec!["3"]);
        assert_eq!(by_term("  "), vec!["3", "2", "Netflix"]);
    }

    #[test]
    fn filter_by_exact_category() {
        let expenses = vec![
            expense("1", 10.0, "Rent", 1, "a"),
            expense("2", 5.0, "Rental car", 9, "a"),
            expense("3", 15.0, "Rent", 5, "b"),
        ];
        let filter = ExpenseFilter {
            search: None,
            category: Some("Rent".into()),
        };
        let ids: Vec<String> = filter_expenses(expenses, &filter)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let expenses = vec![
            expense("old", 1.0, "Other", 1, "a"),
            expense("new", 1.0, "Other", 20, "a"),
            expense("mid", 1.0, "Other", 10, "a"),
        ];
        let recent = recent_expenses(&expenses, 2);
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }
}
