use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{error::AppError, error::Result, state::AppState, users::extractors::CurrentUser};

use super::dto::{
    CreateMealRequest, CreatedMealResponse, MealListResponse, Pagination, SummaryResponse,
    UpdateMealRequest,
};
use super::repo_types::{Meal, MealChanges, NewMeal};
use super::services::{summary_for_user, validate_pagination};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/summary", get(get_summary))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<impl IntoResponse> {
    let new_meal = NewMeal::try_from(payload).inspect_err(|e| {
        warn!(error = %e, %user_id, "invalid meal payload");
    })?;

    let meal = state.meals.create(user_id, new_meal).await?;
    info!(%user_id, meal_id = %meal.id, in_diet = meal.in_diet, "meal created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/meals/{}", meal.id))],
        Json(CreatedMealResponse { id: meal.id }),
    ))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<MealListResponse>> {
    validate_pagination(&p)?;
    let meals = state.meals.list_by_user(user_id, p.limit, p.offset).await?;
    Ok(Json(MealListResponse { meals }))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Meal>> {
    match state.meals.find(user_id, id).await? {
        Some(meal) => Ok(Json(meal)),
        None => {
            warn!(%user_id, %id, "meal not found");
            Err(AppError::NotFound("Meal not found".into()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<StatusCode> {
    let changes = MealChanges::try_from(payload)?;
    if !state.meals.update(user_id, id, changes).await? {
        warn!(%user_id, %id, "update of unknown meal");
        return Err(AppError::NotFound("Meal not found".into()));
    }
    info!(%user_id, meal_id = %id, "meal updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.meals.delete(user_id, id).await? {
        warn!(%user_id, %id, "delete of unknown meal");
        return Err(AppError::NotFound("Meal not found".into()));
    }
    info!(%user_id, meal_id = %id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<SummaryResponse>> {
    let summary = summary_for_user(&state, user_id).await?;
    Ok(Json(SummaryResponse { summary }))
}
