use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::user::{NewUser, User},
};

/// Repository for user registration that stores a user and its photos atomically
#[async_trait]
pub trait UserRegistrationRepository {
    /// Insert the user and every owned photo in a single transaction.
    ///
    /// Fails with `RepositoryError::DuplicateEmail` when the email is taken.
    async fn register_user_with_photos(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Whether an account already uses this email
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;
}
