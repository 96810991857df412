//! User service for business logic operations.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates a new user. A duplicate email fails with `Duplicate`.
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        self.repo.create(new_user).await
    }

    /// Gets a user by id, or `NotFound`.
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id = {} not found.", id)))
    }

    /// Lists all users.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    /// Applies a partial update; fields that are not supplied stay unchanged.
    pub async fn update_user(&self, id: i32, update: UpdateUser) -> AppResult<User> {
        let current = self.get_user(id).await?;
        if update.name.is_none() && update.email.is_none() {
            return Ok(current);
        }
        self.repo.update(id, update).await
    }

    /// Deletes a user, reporting whether a row was removed.
    pub async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let affected = self.repo.delete(id).await?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::Repositories;

    fn service() -> (Repositories, UserService) {
        let repos = Repositories::in_memory();
        let service = UserService::new(repos.users.clone());
        (repos, service)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let (_, service) = service();
        service
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();
        let err = service
            .create_user(NewUser {
                name: "Other Alice".to_string(),
                email: "ALICE@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn partial_update_keeps_missing_fields() {
        let (_, service) = service();
        let user = service
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateUser {
                    name: Some("Alicia".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "alice@example.com");

        let untouched = service
            .update_user(user.id, UpdateUser::default())
            .await
            .unwrap();
        assert_eq!(untouched, updated);
    }

    #[tokio::test]
    async fn updating_to_a_taken_email_fails() {
        let (_, service) = service();
        service
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();
        let bob = service
            .create_user(NewUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap();
        let err = service
            .update_user(
                bob.id,
                UpdateUser {
                    name: None,
                    email: Some("alice@example.com".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let (_, service) = service();
        let user = service
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();
        assert!(service.delete_user(user.id).await.unwrap());
        assert!(!service.delete_user(user.id).await.unwrap());
        let err = service.get_user(user.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
