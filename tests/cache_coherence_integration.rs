//! Cache coherence across the mutation paths: a same-owner read after any
//! committed mutation must reflect that mutation, regardless of what was
//! cached before it.

use std::sync::Arc;
use std::time::Duration;

use taskline::adapters::cache::InMemoryListCache;
use taskline::adapters::events::InMemoryEventBus;
use taskline::adapters::memory::InMemoryTaskRepository;
use taskline::application::tasks::{
    CompleteTaskCommand, CompleteTaskHandler, CreateTaskCommand, CreateTaskHandler,
    DeleteTaskCommand, DeleteTaskHandler, ListTasksHandler,
};
use taskline::domain::foundation::OwnerId;
use taskline::domain::task::TaskStatus;
use taskline::ports::{task_list_key, ListCache};

const TTL: Duration = Duration::from_secs(30);

struct Stack {
    tasks: Arc<InMemoryTaskRepository>,
    cache: Arc<InMemoryListCache>,
    bus: Arc<InMemoryEventBus>,
}

impl Stack {
    fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            cache: Arc::new(InMemoryListCache::new()),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    fn owner(&self) -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    fn create(&self) -> CreateTaskHandler {
        CreateTaskHandler::new(self.tasks.clone(), self.cache.clone(), self.bus.clone())
    }

    fn list(&self) -> ListTasksHandler {
        ListTasksHandler::new(self.tasks.clone(), self.cache.clone(), TTL)
    }

    async fn create_task(&self, title: &str) -> taskline::domain::task::Task {
        self.create()
            .handle(CreateTaskCommand {
                owner_id: self.owner(),
                title: title.to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn read_after_create_sees_the_new_task() {
    let stack = Stack::new();

    // Warm the cache with the empty list first.
    assert!(stack.list().handle(&stack.owner()).await.unwrap().is_empty());

    stack.create_task("Buy milk").await;

    let listed = stack.list().handle(&stack.owner()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Buy milk");
}

#[tokio::test]
async fn read_through_populates_and_serves_from_cache() {
    let stack = Stack::new();
    stack.create_task("Buy milk").await;

    let key = task_list_key(&stack.owner());
    assert_eq!(stack.cache.get(&key).await, None);

    stack.list().handle(&stack.owner()).await.unwrap();
    assert!(stack.cache.get(&key).await.is_some());

    // With the cache warm, a dead database goes unnoticed.
    stack.tasks.fail_writes(true);
    let listed = stack.list().handle(&stack.owner()).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn read_after_complete_sees_done_status() {
    let stack = Stack::new();
    let task = stack.create_task("Buy milk").await;

    // Cache the OPEN version.
    stack.list().handle(&stack.owner()).await.unwrap();

    CompleteTaskHandler::new(stack.tasks.clone(), stack.cache.clone(), stack.bus.clone())
        .handle(CompleteTaskCommand {
            owner_id: stack.owner(),
            id: task.id,
        })
        .await
        .unwrap();

    let listed = stack.list().handle(&stack.owner()).await.unwrap();
    assert_eq!(listed[0].status, TaskStatus::Done);
}

#[tokio::test]
async fn read_after_delete_sees_the_task_gone() {
    let stack = Stack::new();
    let task = stack.create_task("Buy milk").await;
    stack.list().handle(&stack.owner()).await.unwrap();

    DeleteTaskHandler::new(stack.tasks.clone(), stack.cache.clone(), stack.bus.clone())
        .handle(DeleteTaskCommand {
            owner_id: stack.owner(),
            id: task.id,
        })
        .await
        .unwrap();

    assert!(stack.list().handle(&stack.owner()).await.unwrap().is_empty());
}

#[tokio::test]
async fn broker_outage_never_blocks_mutations_or_reads() {
    let stack = Stack::new();
    stack.bus.fail_publishes(true);

    let task = stack.create_task("Buy milk").await;
    assert_eq!(task.title, "Buy milk");

    let listed = stack.list().handle(&stack.owner()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(stack.bus.published().is_empty());
}

#[tokio::test]
async fn mutation_only_invalidates_its_own_owner() {
    let stack = Stack::new();
    let other = OwnerId::new("u2").unwrap();
    let other_key = task_list_key(&other);
    stack
        .cache
        .set(&other_key, b"[]".to_vec(), Duration::from_secs(30))
        .await;

    stack.create_task("Buy milk").await;

    assert!(stack.cache.get(&other_key).await.is_some());
    assert_eq!(stack.cache.get(&task_list_key(&stack.owner())).await, None);
}
