use todo_views_backend::datalayer::CRUD::helper::password::make_password;
use todo_views_backend::datalayer::CRUD::{PgTodoStore, PgUserStore};
use todo_views_backend::datalayer::db_ops::{DbManager, initialize_database};
use todo_views_backend::datalayer::{NewTodo, NewUser, TodoChanges, TodoStore, UserStore};
use todo_views_backend::errors::errors::ServiceError;

/// Connect to the database named by DATABASE_URL, or `None` to skip the test
async fn connect() -> Option<DbManager> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Skip test if DATABASE_URL is not set
    if std::env::var("DATABASE_URL").is_err() {
        println!("⚠️  Skipping test: DATABASE_URL not set");
        return None;
    }

    println!("🔧 Initializing database...");
    match initialize_database().await {
        Ok(db) => {
            println!("✅ Database initialized successfully");
            Some(db)
        }
        Err(e) => {
            println!("❌ Failed to initialize database: {}", e);
            None
        }
    }
}

#[tokio::test]
async fn test_todo_create_update_read_delete_flow() {
    println!("\n=== TEST: Todo Create-Update-Read-Delete Flow ===");

    let Some(db) = connect().await else {
        return;
    };
    let store = PgTodoStore::new(db.pool_arc());
    let tag = uuid::Uuid::new_v4().simple().to_string();

    // === STEP 1: CREATE ===
    println!("\n📝 STEP 1: Creating a new todo...");
    let created = store
        .insert(NewTodo {
            title: format!("flow {}", tag),
            content: "created by the store test".to_string(),
            priority: 4,
            is_done: false,
        })
        .await
        .unwrap();
    println!("✅ Todo created");
    println!("   - ID: {}", created.id);
    println!("   - Title: {}", created.title);
    assert_eq!(created.priority, 4);
    assert!(!created.is_done);

    // === STEP 2: UPDATE ===
    println!("\n🔄 STEP 2: Marking the todo done...");
    let updated = store
        .update(
            created.id,
            TodoChanges {
                is_done: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    println!("✅ Todo updated at {}", updated.updated_at);
    assert!(updated.is_done);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.content, created.content);
    assert!(updated.updated_at >= created.updated_at);

    // === STEP 3: READ ===
    println!("\n🔍 STEP 3: Reading the todo back...");
    let fetched = store.get(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert!(fetched.is_done);
    println!("✅ Todo read back");

    // === STEP 4: DELETE ===
    println!("\n🗑️  STEP 4: Deleting the todo...");
    store.delete(created.id).await.unwrap();
    assert!(matches!(
        store.get(created.id).await,
        Err(ServiceError::TodoNotFound(id)) if id == created.id
    ));
    assert!(matches!(
        store.delete(created.id).await,
        Err(ServiceError::TodoNotFound(_))
    ));
    println!("✅ Todo deleted");

    db.shutdown().await;
    println!("\n=== TEST COMPLETED SUCCESSFULLY ===\n");
}

#[tokio::test]
async fn test_todo_listing_order() {
    println!("\n=== TEST: Todo Listing Order ===");

    let Some(db) = connect().await else {
        return;
    };
    let store = PgTodoStore::new(db.pool_arc());
    let tag = uuid::Uuid::new_v4().simple().to_string();

    let mut ids = Vec::new();
    for priority in [7, 5, 5] {
        let todo = store
            .insert(NewTodo {
                title: format!("order {} p{}", tag, priority),
                content: String::new(),
                priority,
                is_done: false,
            })
            .await
            .unwrap();
        ids.push(todo.id);
    }

    let ours: Vec<i64> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|todo| todo.title.contains(&tag))
        .map(|todo| todo.id)
        .collect();
    println!("   - Listed ids: {:?}", ours);
    assert_eq!(ours, vec![ids[1], ids[2], ids[0]]);

    for id in ids {
        store.delete(id).await.unwrap();
    }
    db.shutdown().await;
    println!("\n=== TEST COMPLETED SUCCESSFULLY ===\n");
}

#[tokio::test]
async fn test_user_create_and_lookup() {
    println!("\n=== TEST: User Create and Lookup ===");

    let Some(db) = connect().await else {
        return;
    };
    let store = PgUserStore::new(db.pool_arc());
    let username = format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);

    let new_user = NewUser {
        username: username.clone(),
        email: format!("{}@example.com", username),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password: make_password("secret").unwrap(),
        is_active: true,
        is_staff: false,
    };

    let created = store.create(new_user.clone()).await.unwrap();
    println!("✅ User created with ID {}", created.id);
    assert_eq!(created.username, username);

    let found = store.find_by_username(&username).await.unwrap();
    assert_eq!(found.map(|user| user.id), Some(created.id));

    println!("\n🚫 Creating the same username again...");
    assert!(matches!(
        store.create(new_user).await,
        Err(ServiceError::UserAlreadyExists(name)) if name == username
    ));
    println!("✅ Duplicate username rejected");

    let listed = store.list().await.unwrap();
    assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));

    db.shutdown().await;
    println!("\n=== TEST COMPLETED SUCCESSFULLY ===\n");
}
