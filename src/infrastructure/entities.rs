//! Database entities

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Message {
    pub id: i64,
    pub category: String,
    pub content: String,
    pub image: Option<String>,
    pub time: String,
    pub service_attitude: Option<i32>,
    pub food_quality: Option<String>,
    pub overall_rating: Option<String>,
}

/// A validated message that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub category: String,
    pub content: String,
    pub image: Option<String>,
    pub time: String,
    pub service_attitude: Option<i32>,
    pub food_quality: Option<String>,
    pub overall_rating: Option<String>,
}
