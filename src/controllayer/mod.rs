pub mod health;
pub mod pagination;
pub mod todos;
pub mod users;
pub mod views;
