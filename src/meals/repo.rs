use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Meal, MealChanges, NewMeal};
use super::summary::DietEntry;

/// Ownership-filtered access to meals. Every call is scoped to one user.
#[async_trait]
pub trait MealStore: Send + Sync {
    async fn create(&self, user_id: Uuid, meal: NewMeal) -> anyhow::Result<Meal>;

    /// Newest first. `limit = None` returns everything from `offset` on.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> anyhow::Result<Vec<Meal>>;

    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;

    /// Returns `false` when no meal with that id belongs to the user.
    async fn update(&self, user_id: Uuid, meal_id: Uuid, changes: MealChanges)
        -> anyhow::Result<bool>;

    /// Returns `false` when no meal with that id belongs to the user.
    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool>;

    /// The user's complete history, never paged, ordered by `(date, id)`.
    async fn list_diet_entries(&self, user_id: Uuid) -> anyhow::Result<Vec<DietEntry>>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn create(&self, user_id: Uuid, meal: NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, user_id, name, description, date, in_diet)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, description, date, in_diet
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.date)
        .bind(meal.in_diet)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date, in_diet
            FROM meals
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list meals")?;
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date, in_diet
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find meal")?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE meals
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                date = COALESCE($5, date),
                in_diet = COALESCE($6, in_diet)
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.date)
        .bind(changes.in_diet)
        .execute(&self.db)
        .await
        .context("update meal")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_diet_entries(&self, user_id: Uuid) -> anyhow::Result<Vec<DietEntry>> {
        let rows = sqlx::query_as::<_, (Uuid, OffsetDateTime, bool)>(
            r#"
            SELECT id, date, in_diet
            FROM meals
            WHERE user_id = $1
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list diet entries")?;
        Ok(rows
            .into_iter()
            .map(|(id, date, in_diet)| DietEntry { id, date, in_diet })
            .collect())
    }
}
