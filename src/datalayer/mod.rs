#![allow(non_snake_case)]

pub mod CRUD;
#[cfg(feature = "sqlx")]
pub mod db_ops;

pub use CRUD::store::{TodoStore, UserStore};
pub use CRUD::types::{NewTodo, NewUser, Todo, TodoChanges, User};
#[cfg(feature = "sqlx")]
pub use db_ops::{DbConfig, DbManager, initialize_database};
