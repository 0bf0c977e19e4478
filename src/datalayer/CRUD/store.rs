use async_trait::async_trait;

use crate::datalayer::CRUD::types::{NewTodo, NewUser, Todo, TodoChanges, User};
use crate::errors::ServiceResult;

/// Persistence for todo records.
///
/// Implementations must return `list` ordered by ascending priority, then
/// ascending id, and report absent ids as `ServiceError::TodoNotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list(&self) -> ServiceResult<Vec<Todo>>;

    async fn get(&self, id: i64) -> ServiceResult<Todo>;

    async fn insert(&self, todo: NewTodo) -> ServiceResult<Todo>;

    async fn update(&self, id: i64, changes: TodoChanges) -> ServiceResult<Todo>;

    async fn delete(&self, id: i64) -> ServiceResult<()>;

    /// Round-trip to the backend, used by health probes
    async fn ping(&self) -> ServiceResult<()>;

    /// Backend name reported by health checks
    fn backend(&self) -> &'static str;
}

/// Read access to user accounts, plus creation for the bootstrap admin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users ordered by id
    async fn list(&self) -> ServiceResult<Vec<User>>;

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>>;

    async fn create(&self, user: NewUser) -> ServiceResult<User>;
}
