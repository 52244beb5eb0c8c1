use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // doubles as the session identifier
    pub name: String,
    pub email: String,              // unique, lowercased
    pub created_at: OffsetDateTime,
}
