use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::datalayer::CRUD::store::{TodoStore, UserStore};
use crate::datalayer::CRUD::types::{NewTodo, NewUser, Todo, TodoChanges, User};
use crate::errors::{ServiceError, ServiceResult};

#[derive(Debug, Default)]
struct Tables {
    todos: BTreeMap<i64, Todo>,
    users: BTreeMap<i64, User>,
    next_todo_id: i64,
    next_user_id: i64,
}

/// Process-local store for both todos and users.
///
/// Ids start at 1 and are never reused, matching a database sequence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> ServiceResult<Vec<Todo>> {
        let tables = self.tables.read().await;
        let mut todos: Vec<Todo> = tables.todos.values().cloned().collect();
        // BTreeMap yields ids ascending, so a stable sort keeps the id tie-break
        todos.sort_by_key(|todo| todo.priority);
        Ok(todos)
    }

    async fn get(&self, id: i64) -> ServiceResult<Todo> {
        let tables = self.tables.read().await;
        tables
            .todos
            .get(&id)
            .cloned()
            .ok_or(ServiceError::TodoNotFound(id))
    }

    async fn insert(&self, todo: NewTodo) -> ServiceResult<Todo> {
        let mut tables = self.tables.write().await;
        tables.next_todo_id += 1;
        let now = chrono::Utc::now();
        let record = Todo {
            id: tables.next_todo_id,
            title: todo.title,
            content: todo.content,
            priority: todo.priority,
            is_done: todo.is_done,
            created_at: now,
            updated_at: now,
        };
        tables.todos.insert(record.id, record.clone());
        debug!(todo_id = record.id, "Inserted todo into memory store");
        Ok(record)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> ServiceResult<Todo> {
        let mut tables = self.tables.write().await;
        let record = tables
            .todos
            .get_mut(&id)
            .ok_or(ServiceError::TodoNotFound(id))?;
        changes.apply_to(record);
        record.updated_at = chrono::Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .todos
            .remove(&id)
            .map(|_| ())
            .ok_or(ServiceError::TodoNotFound(id))
    }

    async fn ping(&self) -> ServiceResult<()> {
        let _ = self.tables.read().await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> ServiceResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> ServiceResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(ServiceError::UserAlreadyExists(user.username));
        }
        tables.next_user_id += 1;
        let record = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password,
            is_active: user.is_active,
            is_staff: user.is_staff,
            date_joined: chrono::Utc::now(),
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str, priority: i32) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            content: String::new(),
            priority,
            is_done: false,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_priority_then_id() {
        let store = MemoryStore::new();
        store.insert(new_todo("c", 3)).await.unwrap();
        store.insert(new_todo("a", 1)).await.unwrap();
        store.insert(new_todo("b", 3)).await.unwrap();

        let titles: Vec<String> = TodoStore::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.insert(new_todo("a", 1)).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert(new_todo("b", 1)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_missing_todo_errors() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(9).await, Err(ServiceError::TodoNotFound(9))));
        assert!(matches!(
            store.update(9, TodoChanges::default()).await,
            Err(ServiceError::TodoNotFound(9))
        ));
        assert!(matches!(store.delete(9).await, Err(ServiceError::TodoNotFound(9))));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            is_active: true,
            is_staff: false,
        };
        store.create(user.clone()).await.unwrap();
        assert!(matches!(
            store.create(user).await,
            Err(ServiceError::UserAlreadyExists(name)) if name == "alice"
        ));
    }
}
