use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A money account (checking, savings, credit card, cash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub user_id: i64,
    pub account_name: String,
    pub account_type: String,
    pub balance: f64,
    pub currency: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Request payload for creating or updating an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub account_name: String,
    pub account_type: String,
    pub balance: f64,
}
