//! End-to-end event flow: task mutations on one side, stored notifications
//! on the other, joined by the topic-routed bus.

use std::sync::Arc;

use serde_json::json;

use taskline::adapters::cache::InMemoryListCache;
use taskline::adapters::events::InMemoryEventBus;
use taskline::adapters::memory::{InMemoryNotificationRepository, InMemoryTaskRepository};
use taskline::application::notifications::{ListNotificationsHandler, RecordNotificationHandler};
use taskline::application::tasks::{
    CompleteTaskCommand, CompleteTaskHandler, CreateTaskCommand, CreateTaskHandler,
    DeleteTaskCommand, DeleteTaskHandler, ReopenTaskCommand, ReopenTaskHandler,
};
use taskline::domain::foundation::{EventEnvelope, OwnerId};
use taskline::domain::notification::NotificationKind;
use taskline::ports::EventPublisher;

struct Flow {
    tasks: Arc<InMemoryTaskRepository>,
    notifications: Arc<InMemoryNotificationRepository>,
    cache: Arc<InMemoryListCache>,
    bus: Arc<InMemoryEventBus>,
}

impl Flow {
    fn new() -> Self {
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        bus.subscribe(
            "task.*",
            Arc::new(RecordNotificationHandler::new(notifications.clone())),
        );
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            notifications,
            cache: Arc::new(InMemoryListCache::new()),
            bus,
        }
    }

    fn owner(&self) -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    fn create_handler(&self) -> CreateTaskHandler {
        CreateTaskHandler::new(self.tasks.clone(), self.cache.clone(), self.bus.clone())
    }
}

#[tokio::test]
async fn created_task_becomes_exactly_one_notification() {
    let flow = Flow::new();

    flow.create_handler()
        .handle(CreateTaskCommand {
            owner_id: flow.owner(),
            title: "Buy milk".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    let stored = flow.notifications.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message, "Task created: Buy milk");
    assert_eq!(stored[0].kind, NotificationKind::TaskCreated);
    assert_eq!(stored[0].owner_id, flow.owner());
}

#[tokio::test]
async fn full_lifecycle_produces_one_notification_per_event() {
    let flow = Flow::new();
    let owner = flow.owner();

    let task = flow
        .create_handler()
        .handle(CreateTaskCommand {
            owner_id: owner.clone(),
            title: "Ship release".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    CompleteTaskHandler::new(flow.tasks.clone(), flow.cache.clone(), flow.bus.clone())
        .handle(CompleteTaskCommand {
            owner_id: owner.clone(),
            id: task.id,
        })
        .await
        .unwrap();

    ReopenTaskHandler::new(flow.tasks.clone(), flow.cache.clone(), flow.bus.clone())
        .handle(ReopenTaskCommand {
            owner_id: owner.clone(),
            id: task.id,
        })
        .await
        .unwrap();

    DeleteTaskHandler::new(flow.tasks.clone(), flow.cache.clone(), flow.bus.clone())
        .handle(DeleteTaskCommand {
            owner_id: owner.clone(),
            id: task.id,
        })
        .await
        .unwrap();

    let messages: Vec<String> = flow
        .notifications
        .all()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Task created: Ship release",
            "Task completed: Ship release",
            "Task reopened: Ship release",
            "Task deleted: Ship release",
        ]
    );
}

#[tokio::test]
async fn duplicate_delivery_stores_two_rows_without_error() {
    let flow = Flow::new();

    flow.create_handler()
        .handle(CreateTaskCommand {
            owner_id: flow.owner(),
            title: "Buy milk".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    // Redeliver the same envelope, as the broker would after a missed ack.
    let envelope = flow.bus.published().pop().unwrap();
    flow.bus.redeliver(&envelope).await.unwrap();

    let stored = flow.notifications.all();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].message, stored[1].message);
}

#[tokio::test]
async fn unknown_routing_key_is_ignored_end_to_end() {
    let flow = Flow::new();

    flow.bus
        .publish(EventEnvelope::new(
            "task.starred",
            json!({"id": "t1", "ownerId": "u1", "title": "Buy milk"}),
        ))
        .await
        .unwrap();

    assert!(flow.notifications.all().is_empty());
}

#[tokio::test]
async fn missing_title_falls_back_to_task_id() {
    let flow = Flow::new();

    flow.bus
        .publish(EventEnvelope::new(
            "task.deleted",
            json!({"id": "t1", "ownerId": "u1"}),
        ))
        .await
        .unwrap();

    assert_eq!(flow.notifications.all()[0].message, "Task deleted: t1");
}

#[tokio::test]
async fn recorded_notifications_are_listable_newest_first() {
    let flow = Flow::new();
    let create = flow.create_handler();

    for title in ["first", "second", "third"] {
        create
            .handle(CreateTaskCommand {
                owner_id: flow.owner(),
                title: title.to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
    }

    let listed = ListNotificationsHandler::new(flow.notifications.clone())
        .handle(&flow.owner())
        .await
        .unwrap();

    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].message, "Task created: third");
    assert_eq!(listed[2].message, "Task created: first");
}

#[tokio::test]
async fn events_route_only_to_task_subscribers() {
    let flow = Flow::new();

    flow.bus
        .publish(EventEnvelope::new(
            "user.created",
            json!({"id": "u9", "ownerId": "u9"}),
        ))
        .await
        .unwrap();

    assert!(flow.notifications.all().is_empty());
    assert_eq!(flow.bus.published().len(), 1);
}
