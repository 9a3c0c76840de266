// src/models/user.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Unique email, used as the login identifier.
    pub email: String,

    /// Path of the profile image, relative to the static directory.
    pub image: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub is_admin: bool,

    pub created_at: Option<chrono::NaiveDateTime>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_admin_flag(self.is_admin)
    }
}

/// The two kinds of account.
///
/// Stored as the `is_admin` flag; everything above the persistence layer works
/// with the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin { Role::Admin } else { Role::User }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Creating subjects, quizzes and questions.
    pub fn can_manage_content(self) -> bool {
        self.is_admin()
    }

    /// Where a freshly logged-in account of this role lands.
    pub fn dashboard_path(self, user_id: i64) -> String {
        match self {
            Role::Admin => format!("/admin/{}", user_id),
            Role::User => format!("/user/{}", user_id),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Restricts the role select field to 'admin' or 'user'.
fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if role.parse::<Role>().is_err() {
        let mut err = validator::ValidationError::new("invalid_role");
        err.message = Some("Role must be either 'admin' or 'user'.".into());
        return Err(err);
    }
    Ok(())
}

/// Registration form.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(
        min = 2,
        max = 20,
        message = "Username length must be between 2 and 20 characters."
    ))]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,

    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords must match."))]
    pub confirm_password: String,

    #[serde(default)]
    #[validate(custom(function = validate_role))]
    pub role: String,
}

impl RegisterForm {
    /// Only meaningful after `validate()` succeeded.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }
}

/// Login form.
///
/// `role` is required but never compared with the stored account flag; the
/// stored flag alone decides the session role.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,

    #[serde(default)]
    #[validate(custom(function = validate_role))]
    pub role: String,
}
