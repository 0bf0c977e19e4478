use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::datalayer::CRUD::helper::password::make_password;
use crate::datalayer::CRUD::types::{NewUser, User};
use crate::errors::ServiceResult;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.@+-]+$").unwrap_or_else(|e| panic!("invalid username pattern: {}", e))
});

/// Public user fields; the password hash is never exposed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub date_joined: String,
}

/// Account data accepted when creating a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has no more than 150 characters."),
        regex(
            path = *USERNAME_RE,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
}

pub struct UserSerializer;

impl UserSerializer {
    pub fn to_representation(user: &User) -> UserResponse {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_staff: user.is_staff,
            date_joined: user.date_joined.to_rfc3339(),
        }
    }

    /// Validate a create request and hash its password
    pub fn validate_create(mut request: CreateUserRequest) -> ServiceResult<NewUser> {
        request.email = request.email.filter(|email| !email.trim().is_empty());
        request.validate()?;

        Ok(NewUser {
            username: request.username,
            email: request.email.unwrap_or_default(),
            first_name: request.first_name,
            last_name: request.last_name,
            password: make_password(&request.password)?,
            is_active: true,
            is_staff: request.is_staff,
        })
    }
}
