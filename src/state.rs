use std::sync::Arc;

use crate::config::ApiSettings;
use crate::controllayer::pagination::PageNumberPagination;
use crate::datalayer::CRUD::{MemoryStore, TodoStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Todo records
    pub todos: Arc<dyn TodoStore>,
    /// User accounts, read by the listing endpoint and Basic authentication
    pub users: Arc<dyn UserStore>,
    pub settings: Arc<ApiSettings>,
}

impl AppState {
    /// Create state from explicit stores
    pub fn new(
        todos: Arc<dyn TodoStore>,
        users: Arc<dyn UserStore>,
        settings: ApiSettings,
    ) -> Self {
        Self {
            todos,
            users,
            settings: Arc::new(settings),
        }
    }

    /// State backed by a fresh process-local store
    pub fn in_memory(settings: ApiSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, settings)
    }

    /// State backed by the PostgreSQL pool of `db`
    #[cfg(feature = "sqlx")]
    pub fn postgres(db: &crate::datalayer::DbManager, settings: ApiSettings) -> Self {
        use crate::datalayer::CRUD::{PgTodoStore, PgUserStore};

        Self::new(
            Arc::new(PgTodoStore::new(db.pool_arc())),
            Arc::new(PgUserStore::new(db.pool_arc())),
            settings,
        )
    }

    /// Pagination configured from the settings page size
    pub fn pagination(&self) -> PageNumberPagination {
        PageNumberPagination::new(self.settings.page_size)
    }
}
