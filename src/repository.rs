use crate::models::{
    CreateTodoRequest, NewUser, Role, Todo, TodoId, UpdateTodoRequest, User, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// UserRepository
///
/// Abstract contract for the credential store. The auth core only talks to this trait,
/// so a persistent backend can replace the in-memory one without touching it.
///
/// **Send + Sync + async_trait** make `Arc<dyn UserRepository>` shareable across
/// Axum's task boundaries.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match on email.
    async fn find_by_email(&self, email: &str) -> Option<User>;
    async fn find_by_id(&self, id: UserId) -> Option<User>;
    /// Assigns the next id and the default role. Does not check email uniqueness.
    async fn create(&self, new_user: NewUser) -> User;
    /// Replaces the record with the same id. `None` if no such record exists.
    async fn update(&self, user: User) -> Option<User>;
    async fn remove(&self, id: UserId) -> bool;
    async fn find_all(&self) -> Vec<User>;
}

/// TodoRepository
///
/// Contract for the resource store sitting behind the guards.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn find_all(&self) -> Vec<Todo>;
    async fn find_one(&self, id: TodoId) -> Option<Todo>;
    async fn create(&self, req: CreateTodoRequest) -> Todo;
    async fn update(&self, id: TodoId, req: UpdateTodoRequest) -> Option<Todo>;
    async fn remove(&self, id: TodoId) -> bool;
}

pub type UserRepositoryState = Arc<dyn UserRepository>;
pub type TodoRepositoryState = Arc<dyn TodoRepository>;

/// Records keyed by id plus the next id to hand out. Both live behind one lock so
/// allocation and insertion are a single critical section.
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// InMemoryUserRepository
///
/// Default credential store: a `RwLock`-guarded map. Writers are serialized by the lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Option<User> {
        let table = self.table.read().await;
        table.rows.values().find(|u| u.email == email).cloned()
    }

    async fn find_by_id(&self, id: UserId) -> Option<User> {
        self.table.read().await.rows.get(&id).cloned()
    }

    async fn create(&self, new_user: NewUser) -> User {
        let mut table = self.table.write().await;
        let user = User {
            id: table.allocate(),
            email: new_user.email,
            password: new_user.password,
            name: new_user.name,
            role: Role::User,
            created_at: Utc::now(),
        };
        table.rows.insert(user.id, user.clone());
        user
    }

    async fn update(&self, user: User) -> Option<User> {
        let mut table = self.table.write().await;
        let slot = table.rows.get_mut(&user.id)?;
        *slot = user.clone();
        Some(user)
    }

    async fn remove(&self, id: UserId) -> bool {
        self.table.write().await.rows.remove(&id).is_some()
    }

    async fn find_all(&self) -> Vec<User> {
        self.table.read().await.rows.values().cloned().collect()
    }
}

/// InMemoryTodoRepository
///
/// Default resource store, same locking scheme as the user store.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    table: RwLock<Table<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_all(&self) -> Vec<Todo> {
        self.table.read().await.rows.values().cloned().collect()
    }

    async fn find_one(&self, id: TodoId) -> Option<Todo> {
        self.table.read().await.rows.get(&id).cloned()
    }

    async fn create(&self, req: CreateTodoRequest) -> Todo {
        let mut table = self.table.write().await;
        let todo = Todo {
            id: table.allocate(),
            title: req.title,
            description: req.description,
            completed: false,
            created_at: Utc::now(),
        };
        table.rows.insert(todo.id, todo.clone());
        todo
    }

    async fn update(&self, id: TodoId, req: UpdateTodoRequest) -> Option<Todo> {
        let mut table = self.table.write().await;
        let todo = table.rows.get_mut(&id)?;
        if let Some(title) = req.title {
            todo.title = title;
        }
        if let Some(description) = req.description {
            todo.description = Some(description);
        }
        if let Some(completed) = req.completed {
            todo.completed = completed;
        }
        Some(todo.clone())
    }

    async fn remove(&self, id: TodoId) -> bool {
        self.table.write().await.rows.remove(&id).is_some()
    }
}
