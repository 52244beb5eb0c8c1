use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Meal;
use super::summary::MealSummary;

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    pub description: String,
    pub date: String,
    pub in_diet: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub in_diet: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: MealSummary,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}
