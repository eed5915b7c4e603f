use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        error::RepositoryError,
        models::user::{NewUser, User, UserId},
        repositories::user_registration_repository::UserRegistrationRepository,
    },
    infrastructure::entity::{photos, users},
};

fn database_error(e: DbErr) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

/// Unique constraint hits on insert mean the email is already taken
fn insert_error(e: DbErr, email: &str) -> RepositoryError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::DuplicateEmail(email.to_string()),
        _ => database_error(e),
    }
}

/// Shares one connection pool across clones of the repository
#[derive(Clone)]
pub struct PostgresUserRegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl PostgresUserRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

#[async_trait]
impl UserRegistrationRepository for PostgresUserRegistrationRepository {
    async fn register_user_with_photos(&self, user: NewUser) -> Result<User, RepositoryError> {
        // Begin transaction
        let txn = self.db.begin().await.map_err(database_error)?;

        let user_id = UserId::new();
        let created_at = Utc::now();

        // Insert user
        let user_model = users::ActiveModel {
            id: Set(*user_id.as_uuid()),
            first_name: Set(user.first_name().to_string()),
            last_name: Set(user.last_name().to_string()),
            full_name: Set(user.full_name().to_string()),
            email: Set(user.email().to_string()),
            password: Set(user.password_hash().as_str().to_string()),
            avatar: Set(user.avatar().to_string()),
            active: Set(user.active()),
            created_at: Set(created_at.fixed_offset()),
        };

        users::Entity::insert(user_model)
            .exec(&txn)
            .await
            .map_err(|e| insert_error(e, user.email()))?;

        // Insert photos
        let photo_ids: Vec<Uuid> = user.photos().iter().map(|_| Uuid::new_v4()).collect();
        let photo_models: Vec<photos::ActiveModel> = user
            .photos()
            .iter()
            .zip(&photo_ids)
            .map(|(photo, photo_id)| photos::ActiveModel {
                id: Set(*photo_id),
                user_id: Set(*user_id.as_uuid()),
                name: Set(photo.name().to_string()),
                url: Set(photo.url().to_string()),
            })
            .collect();

        if !photo_models.is_empty() {
            photos::Entity::insert_many(photo_models)
                .exec(&txn)
                .await
                .map_err(database_error)?;
        }

        // Commit transaction
        txn.commit().await.map_err(database_error)?;
        debug!("Committed user {} with {} photos", user_id, photo_ids.len());

        Ok(user.into_user(user_id, created_at, photo_ids))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(database_error)?;

        Ok(existing.is_some())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn existing_user(email: &str) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            full_name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: "$argon2id$stub".to_string(),
            avatar: "/uploads/avatars/default.png".to_string(),
            active: false,
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_email_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_user("ada@example.com")]])
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let repository = PostgresUserRegistrationRepository::new(db);

        assert!(repository.email_exists("ada@example.com").await.unwrap());
        assert!(!repository.email_exists("grace@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_user("ada@example.com")]])
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let repository = PostgresUserRegistrationRepository::new(db);
        let cloned = repository.clone();

        // both answers come off the same mocked result queue
        assert!(repository.email_exists("ada@example.com").await.unwrap());
        assert!(!cloned.email_exists("ada@example.com").await.unwrap());
    }

    #[test]
    fn test_non_constraint_errors_stay_database_errors() {
        let error = insert_error(DbErr::Custom("connection reset".to_string()), "ada@example.com");
        assert!(matches!(error, RepositoryError::DatabaseError(msg) if msg.contains("connection reset")));
    }
}
