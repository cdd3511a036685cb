use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::SplitError;
use crate::ledger::Ledger;
use crate::reports::{category_totals, filter_expenses, recent_expenses, ExpenseFilter};
use crate::schemas::{ExpensePatch, MemberPatch, NewExpense, NewMember, DEFAULT_CATEGORIES};

const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseQuery {
    month: Option<u32>,
    year: Option<i32>,
    paid_by: Option<String>,
    search: Option<String>,
    category: Option<String>,
}

#[derive(Deserialize)]
struct RecentQuery {
    limit: Option<usize>,
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/members")]
async fn list_members(ledger: web::Data<Ledger>) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.members()?))
}

#[post("/members")]
async fn add_member(
    ledger: web::Data<Ledger>,
    json: web::Json<NewMember>,
) -> Result<HttpResponse, SplitError> {
    let member = ledger.add_member(json.into_inner())?;
    Ok(HttpResponse::Created().json(member))
}

#[patch("/members/{id}")]
async fn update_member(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
    json: web::Json<MemberPatch>,
) -> Result<HttpResponse, SplitError> {
    let member = ledger.update_member(&id, json.into_inner())?;
    Ok(HttpResponse::Ok().json(member))
}

#[delete("/members/{id}")]
async fn remove_member(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
) -> Result<HttpResponse, SplitError> {
    ledger.remove_member(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/members/{id}/accept")]
async fn accept_member(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.accept_invitation(&id)?))
}

#[post("/members/{id}/reject")]
async fn reject_member(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.reject_invitation(&id)?))
}

#[get("/expenses")]
async fn list_expenses(
    ledger: web::Data<Ledger>,
    query: web::Query<ExpenseQuery>,
) -> Result<HttpResponse, SplitError> {
    let query = query.into_inner();
    let mut expenses = match (query.month, query.year) {
        (Some(month), Some(year)) => ledger.expenses_by_month(month, year)?,
        (None, None) => ledger.visible_expenses()?,
        _ => {
            return Err(SplitError::Validation(
                "month and year must be given together".into(),
            ))
        }
    };
    if let Some(payer) = query.paid_by {
        expenses.retain(|expense| expense.paid_by == payer);
    }
    let filter = ExpenseFilter {
        search: query.search,
        category: query.category,
    };
    Ok(HttpResponse::Ok().json(filter_expenses(expenses, &filter)))
}

#[post("/expenses")]
async fn add_expense(
    ledger: web::Data<Ledger>,
    expense: web::Json<NewExpense>,
) -> Result<HttpResponse, SplitError> {
    let expense = ledger.add_expense(expense.into_inner())?;
    Ok(HttpResponse::Created().json(expense))
}

#[patch("/expenses/{id}")]
async fn update_expense(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
    patch: web::Json<ExpensePatch>,
) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.update_expense(&id, patch.into_inner())?))
}

#[delete("/expenses/{id}")]
async fn delete_expense(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
) -> Result<HttpResponse, SplitError> {
    ledger.delete_expense(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/categories")]
async fn categories() -> HttpResponse {
    HttpResponse::Ok().json(DEFAULT_CATEGORIES)
}

#[get("/balance")]
async fn get_balance(ledger: web::Data<Ledger>) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.balance_report()?))
}

#[get("/settlement")]
async fn get_settlement(ledger: web::Data<Ledger>) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.settlement_plan()?))
}

#[get("/reports/categories")]
async fn report_categories(ledger: web::Data<Ledger>) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(category_totals(&ledger.visible_expenses()?)))
}

#[get("/reports/members")]
async fn report_members(ledger: web::Data<Ledger>) -> Result<HttpResponse, SplitError> {
    Ok(HttpResponse::Ok().json(ledger.member_summaries()?))
}

#[get("/reports/recent")]
async fn report_recent(
    ledger: web::Data<Ledger>,
    query: web::Query<RecentQuery>,
) -> Result<HttpResponse, SplitError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(HttpResponse::Ok().json(recent_expenses(&ledger.visible_expenses()?, limit)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(list_members)
        .service(add_member)
        .service(update_member)
        .service(remove_member)
        .service(accept_member)
        .service(reject_member)
        .service(list_expenses)
        .service(add_expense)
        .service(update_expense)
        .service(delete_expense)
        .service(categories)
        .service(get_balance)
        .service(get_settlement)
        .service(report_categories)
        .service(report_members)
        .service(report_recent);
}
