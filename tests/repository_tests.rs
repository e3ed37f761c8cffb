use std::sync::Arc;
use todo_api::{
    InMemoryTodoRepository, InMemoryUserRepository,
    models::{CreateTodoRequest, NewUser, Role, UpdateTodoRequest},
    repository::{TodoRepository, UserRepository},
};

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: "pw".to_string(),
        name: "Name".to_string(),
    }
}

fn new_todo(title: &str) -> CreateTodoRequest {
    CreateTodoRequest {
        title: title.to_string(),
        description: None,
    }
}

// --- Users ---

#[tokio::test]
async fn test_user_create_and_lookup() {
    let repo = InMemoryUserRepository::new();
    let created = repo.create(new_user("a@x.com")).await;

    assert_eq!(created.id, 1);
    assert_eq!(created.role, Role::User);
    assert_eq!(repo.find_by_id(created.id).await, Some(created.clone()));
    assert_eq!(repo.find_by_email("a@x.com").await, Some(created));
    assert_eq!(repo.find_by_email("A@x.com").await, None);
    assert_eq!(repo.find_by_id(99).await, None);
}

#[tokio::test]
async fn test_user_update_and_remove() {
    let repo = InMemoryUserRepository::new();
    let mut user = repo.create(new_user("a@x.com")).await;

    user.role = Role::Admin;
    assert_eq!(repo.update(user.clone()).await, Some(user.clone()));
    assert_eq!(repo.find_by_id(user.id).await.unwrap().role, Role::Admin);

    assert!(repo.remove(user.id).await);
    assert!(!repo.remove(user.id).await);
    assert_eq!(repo.update(user).await, None);
}

#[tokio::test]
async fn test_user_ids_not_reused_after_remove() {
    let repo = InMemoryUserRepository::new();
    let first = repo.create(new_user("a@x.com")).await;
    repo.remove(first.id).await;
    let second = repo.create(new_user("b@x.com")).await;

    assert!(second.id > first.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_ids() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let handles: Vec<_> = (0..50)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create(new_user(&format!("u{i}@x.com"))).await.id })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 50);
    assert_eq!(repo.find_all().await.len(), 50);
}

// --- Todos ---

#[tokio::test]
async fn test_todo_crud() {
    let repo = InMemoryTodoRepository::new();
    let todo = repo.create(new_todo("write docs")).await;

    assert_eq!(todo.id, 1);
    assert!(!todo.completed);
    assert_eq!(repo.find_all().await, vec![todo.clone()]);
    assert_eq!(repo.find_one(todo.id).await, Some(todo.clone()));

    assert!(repo.remove(todo.id).await);
    assert_eq!(repo.find_one(todo.id).await, None);
    assert!(!repo.remove(todo.id).await);
}

#[tokio::test]
async fn test_todo_partial_update() {
    let repo = InMemoryTodoRepository::new();
    let todo = repo
        .create(CreateTodoRequest {
            title: "original".to_string(),
            description: Some("keep me".to_string()),
        })
        .await;

    let updated = repo
        .update(
            todo.id,
            UpdateTodoRequest {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.completed);
    assert_eq!(updated.title, "original");
    assert_eq!(updated.description.as_deref(), Some("keep me"));

    let renamed = repo
        .update(
            todo.id,
            UpdateTodoRequest {
                title: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.title, "renamed");
    assert!(renamed.completed);
}

#[tokio::test]
async fn test_todo_update_missing() {
    let repo = InMemoryTodoRepository::new();
    assert_eq!(repo.update(5, UpdateTodoRequest::default()).await, None);
}
