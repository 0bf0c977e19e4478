use chrono::{DateTime, Utc};
use sea_query::Iden;
use serde::{Deserialize, Serialize};

pub mod DBTables {
    pub const TODOS: &str = "todos";
    pub const USERS: &str = "users";
}

/// Todo struct matching the todos table schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub priority: i32,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated todo ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub content: String,
    pub priority: i32,
    pub is_done: bool,
}

/// Validated field changes for an existing todo; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<i32>,
    pub is_done: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.priority.is_none()
            && self.is_done.is_none()
    }

    /// Apply the changes onto an in-memory record
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(content) = &self.content {
            todo.content = content.clone();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(is_done) = self.is_done {
            todo.is_done = is_done;
        }
    }
}

/// User struct matching the users table schema.
/// `password` holds the encoded hash and is never serialized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// A user ready to be inserted; `password` is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_active: bool,
    pub is_staff: bool,
}

#[derive(Iden, Clone, Copy)]
pub enum Todos {
    Table,
    Id,
    Title,
    Content,
    Priority,
    IsDone,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Password,
    IsActive,
    IsStaff,
    DateJoined,
}
