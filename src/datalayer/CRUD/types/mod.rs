pub mod types;

pub use types::{DBTables, NewTodo, NewUser, Todo, TodoChanges, Todos, User, Users};
