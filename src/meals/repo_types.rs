use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub in_diet: bool,
}

/// Validated input for a new meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub date: OffsetDateTime,
    pub in_diet: bool,
}

/// Validated partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<OffsetDateTime>,
    pub in_diet: Option<bool>,
}

impl MealChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.in_diet.is_none()
    }

    pub fn apply(self, meal: &mut Meal) {
        if let Some(name) = self.name {
            meal.name = name;
        }
        if let Some(description) = self.description {
            meal.description = description;
        }
        if let Some(date) = self.date {
            meal.date = date;
        }
        if let Some(in_diet) = self.in_diet {
            meal.in_diet = in_diet;
        }
    }
}
