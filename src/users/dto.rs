use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::store::User;

/// Request body for user creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client. Never carries the
/// password digest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRest {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserRest {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
