pub mod balance;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod reports;
pub mod schemas;
pub mod settlement;
pub mod validation;

pub use balance::{compute_balances, Balance, BalanceReport};
pub use error::{Result, SplitError};
pub use settlement::{plan_settlement, SettlementPlan, Transfer};
