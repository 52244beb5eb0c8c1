//! In-process stores. Used by the test-suite and by `DATABASE_URL=memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::meals::{
    repo::MealStore,
    repo_types::{Meal, MealChanges, NewMeal},
    summary::DietEntry,
};
use crate::users::{repo::UserStore, repo_types::User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, name: &str, email: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(Some(user))
    }
}

#[derive(Default)]
pub struct MemoryMealStore {
    meals: RwLock<HashMap<Uuid, Meal>>,
}

impl MemoryMealStore {
    async fn owned_by(&self, user_id: Uuid) -> Vec<Meal> {
        self.meals
            .read()
            .await
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MealStore for MemoryMealStore {
    async fn create(&self, user_id: Uuid, meal: NewMeal) -> anyhow::Result<Meal> {
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id,
            name: meal.name,
            description: meal.description,
            date: meal.date,
            in_diet: meal.in_diet,
        };
        self.meals.write().await.insert(meal.id, meal.clone());
        Ok(meal)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let mut meals = self.owned_by(user_id).await;
        meals.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        let offset = usize::try_from(offset)?;
        let limit = match limit {
            Some(l) => usize::try_from(l)?,
            None => usize::MAX,
        };
        Ok(meals.into_iter().skip(offset).take(limit).collect())
    }

    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals.get(&meal_id).filter(|m| m.user_id == user_id).cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        match meals.get_mut(&meal_id).filter(|m| m.user_id == user_id) {
            Some(meal) => {
                changes.apply(meal);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        if meals.get(&meal_id).is_some_and(|m| m.user_id == user_id) {
            meals.remove(&meal_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_diet_entries(&self, user_id: Uuid) -> anyhow::Result<Vec<DietEntry>> {
        let mut entries: Vec<DietEntry> =
            self.owned_by(user_id).await.iter().map(DietEntry::from).collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }
}
