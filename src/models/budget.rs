use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A monthly spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub budget_id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub budget_amount: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: NaiveDateTime,
}

/// Request payload for creating or updating a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category_id: i64,
    pub budget_amount: f64,
    pub month: u32,
    pub year: i32,
}
