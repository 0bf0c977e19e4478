pub mod serializer;
pub mod users_handler;

pub use serializer::{UserResponse, UserSerializer};
