use serde::Serialize;
use sqlx::FromRow;

/// Column list selected for every read, in table order.
pub const RECIPE_COLUMNS: &str = "id, cuisine, title, rating, prep_time, cook_time, total_time, \
     description, nutrients, serves, content_hash";

/// One row of the `recipes` table as returned to clients.
///
/// No column is temporal; a timestamp column added later would be declared
/// here with an RFC 3339 serializer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub cuisine: Option<String>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub nutrients: Option<serde_json::Value>,
    pub serves: Option<String>,
    pub content_hash: Option<String>,
}
