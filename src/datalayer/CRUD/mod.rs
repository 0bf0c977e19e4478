pub mod helper;
pub mod memory;
pub mod sql_generator;
pub mod store;
#[cfg(feature = "sqlx")]
pub mod todos;
pub mod types;
#[cfg(feature = "sqlx")]
pub mod users;

pub use memory::MemoryStore;
pub use store::{TodoStore, UserStore};
#[cfg(feature = "sqlx")]
pub use todos::PgTodoStore;
#[cfg(feature = "sqlx")]
pub use users::PgUserStore;
