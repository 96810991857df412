//! User-related DTOs for API requests and responses.

use crate::models::{NewUser, UpdateUser, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name must not be blank"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
        }
    }
}

/// Request body for a partial user update; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name must not be blank"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            name: self.name,
            email: self.email,
        }
    }
}

/// Response body for user data.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
