use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::schemas::{ExpenseId, MemberId};

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Error, Debug, PartialEq)]
pub enum SplitError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Expense has no participants to split with")]
    EmptySplit,

    #[error("Unknown member referenced by expense: {0}")]
    UnknownMember(MemberId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Member {id} is still part of {expenses} expense(s)")]
    MemberInUse { id: MemberId, expenses: usize },

    #[error("The acting member cannot be removed: {0}")]
    CannotRemoveSelf(MemberId),

    #[error("Balances do not sum to zero (residual {residual:.2})")]
    Unbalanced { residual: f64 },

    #[error("Ledger state is unavailable")]
    StatePoisoned,
}

impl ResponseError for SplitError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "type": self.error_type()
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            SplitError::Validation(_) | SplitError::EmptySplit | SplitError::UnknownMember(_) => {
                StatusCode::BAD_REQUEST
            }
            SplitError::MemberNotFound(_) | SplitError::ExpenseNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SplitError::CannotRemoveSelf(_) => StatusCode::FORBIDDEN,
            SplitError::MemberInUse { .. } | SplitError::Unbalanced { .. } => {
                StatusCode::CONFLICT
            }
            SplitError::StatePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl SplitError {
    fn error_type(&self) -> &str {
        match self {
            SplitError::Validation(_) => "validation_error",
            SplitError::EmptySplit => "empty_split",
            SplitError::UnknownMember(_) => "unknown_member",
            SplitError::MemberNotFound(_) | SplitError::ExpenseNotFound(_) => "not_found",
            SplitError::MemberInUse { .. } => "member_in_use",
            SplitError::CannotRemoveSelf(_) => "forbidden",
            SplitError::Unbalanced { .. } => "unbalanced",
            SplitError::StatePoisoned => "internal_error",
        }
    }
}
