use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::dto::{CreateMealRequest, Pagination, UpdateMealRequest};
use super::repo_types::{MealChanges, NewMeal};
use super::summary::{summarize, MealSummary};

/// Parses a meal date into UTC. Offset-less forms are read as UTC.
pub(crate) fn parse_meal_date(raw: &str) -> Result<OffsetDateTime> {
    let raw = raw.trim();
    let invalid = || AppError::Validation(format!("Invalid date: {raw}"));
    // `[year]` would otherwise accept a leading sign
    if raw.starts_with(['+', '-']) {
        return Err(invalid());
    }
    let parsed = parse_any_form(raw).ok_or_else(invalid)?;

    // stored dates must stay writable as RFC 3339
    parsed
        .checked_to_offset(UtcOffset::UTC)
        .filter(|utc| (0..=9999).contains(&utc.year()))
        .ok_or_else(|| AppError::Validation(format!("Date out of range: {raw}")))
}

fn parse_any_form(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }
    let naive = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
    });
    if let Ok(dt) = naive {
        return Some(dt.assume_utc());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

fn validate_name(name: String) -> Result<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Meal name must not be empty".into()));
    }
    Ok(name)
}

impl TryFrom<CreateMealRequest> for NewMeal {
    type Error = AppError;

    fn try_from(req: CreateMealRequest) -> Result<Self> {
        Ok(NewMeal {
            name: validate_name(req.name)?,
            description: req.description.trim().to_string(),
            date: parse_meal_date(&req.date)?,
            in_diet: req.in_diet,
        })
    }
}

impl TryFrom<UpdateMealRequest> for MealChanges {
    type Error = AppError;

    fn try_from(req: UpdateMealRequest) -> Result<Self> {
        let changes = MealChanges {
            name: req.name.map(validate_name).transpose()?,
            description: req.description.map(|d| d.trim().to_string()),
            date: req.date.as_deref().map(parse_meal_date).transpose()?,
            in_diet: req.in_diet,
        };
        if changes.is_empty() {
            return Err(AppError::Validation("Nothing to update".into()));
        }
        Ok(changes)
    }
}

pub(crate) fn validate_pagination(p: &Pagination) -> Result<()> {
    if p.offset < 0 || p.limit.is_some_and(|l| l < 0) {
        return Err(AppError::Validation("limit and offset must be non-negative".into()));
    }
    Ok(())
}

/// Reads the user's full history and summarizes it.
pub async fn summary_for_user(state: &AppState, user_id: Uuid) -> Result<MealSummary> {
    let entries = state.meals.list_diet_entries(user_id).await?;
    let summary = summarize(&entries);
    debug!(%user_id, meals = summary.total_meals, best = summary.best_sequence, "summary computed");
    Ok(summary)
}
