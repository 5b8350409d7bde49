use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    /// Running time in minutes.
    pub length: i32,
    pub description: Option<String>,
    /// Minimum age in whole years.
    pub age_limit: i32,
}
