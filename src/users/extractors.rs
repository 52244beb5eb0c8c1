use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;
use uuid::Uuid;

use super::services::session_id_from_headers;
use crate::{error::AppError, state::AppState};

/// Resolves the `sessionId` cookie to the id of a registered user.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = session_id_from_headers(&parts.headers, &state.config.session.cookie_name)
            .ok_or_else(|| AppError::Unauthorized("Missing session cookie".into()))?;

        let user_id = Uuid::parse_str(raw).map_err(|_| {
            warn!("malformed session cookie");
            AppError::Unauthorized("Invalid session".into())
        })?;

        if state.users.find_by_id(user_id).await?.is_none() {
            warn!(%user_id, "session for unknown user");
            return Err(AppError::Unauthorized("Invalid session".into()));
        }

        Ok(CurrentUser(user_id))
    }
}
