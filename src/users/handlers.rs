use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, Result},
    state::AppState,
    users::{
        dto::{PublicUser, RegisterRequest},
        services::{is_valid_email, session_cookie},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

fn email_taken() -> AppError {
    AppError::Conflict("There is already an user with this e-mail".into())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.email = payload.email.trim().to_lowercase();
    payload.name = payload.name.trim().to_string();

    if payload.name.is_empty() {
        warn!("empty name");
        return Err(AppError::Validation("Name must not be empty".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(email_taken());
    }

    // a concurrent registration can still win between the check and the insert
    let Some(user) = state.users.create(&payload.name, &payload.email).await? else {
        warn!(email = %payload.email, "email registered concurrently");
        return Err(email_taken());
    };
    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&state.config.session, user.id))],
        Json(PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            name: "Anderson".to_string(),
            email: "test@example.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"name\":\"Anderson\""));
        assert!(json.contains("id"));
    }
}
