pub mod serializer;
pub mod todos_handler;

pub use serializer::{TodoResponse, TodoSerializer};
