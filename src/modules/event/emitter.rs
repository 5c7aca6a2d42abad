use deadpool_redis::redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::error;
use crate::modules::event::model::{EventConfig, NotificationEvent, SuggestionEvent};

/// Fire-and-forget publication to a named destination.
pub trait EventEmitter: Send + Sync {
    fn publish(&self, destination: &str, payload: serde_json::Value);
}

/// Pushes JSON payloads onto one Redis list.
pub struct QueuePublisher {
    destination: String,
    pool: deadpool_redis::Pool,
}

impl QueuePublisher {
    fn new(destination: &str, pool: deadpool_redis::Pool) -> Self {
        Self { destination: destination.to_string(), pool }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub async fn push(&self, payload: &serde_json::Value) -> Result<(), error::SystemError> {
        let body = serde_json::to_string(payload)?;
        let mut conn = self.pool.get().await?;
        conn.rpush::<_, _, ()>(&self.destination, body).await?;
        Ok(())
    }
}

/// Publishers keyed by destination, created on first use.
pub struct DestinationRegistry {
    pool: deadpool_redis::Pool,
    publishers: Mutex<HashMap<String, Arc<QueuePublisher>>>,
}

impl DestinationRegistry {
    pub fn new(pool: deadpool_redis::Pool) -> Self {
        Self { pool, publishers: Mutex::new(HashMap::new()) }
    }

    pub fn get_or_create(&self, destination: &str) -> Arc<QueuePublisher> {
        let mut publishers = self.publishers.lock().unwrap_or_else(|e| e.into_inner());

        publishers
            .entry(destination.to_string())
            .or_insert_with(|| {
                tracing::info!("Creating publisher for destination {}", destination);
                Arc::new(QueuePublisher::new(destination, self.pool.clone()))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.publishers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct RedisEventEmitter {
    registry: Arc<DestinationRegistry>,
}

impl RedisEventEmitter {
    pub fn new(registry: Arc<DestinationRegistry>) -> Self {
        Self { registry }
    }
}

impl EventEmitter for RedisEventEmitter {
    fn publish(&self, destination: &str, payload: serde_json::Value) {
        let publisher = self.registry.get_or_create(destination);

        tokio::spawn(async move {
            if let Err(e) = publisher.push(&payload).await {
                tracing::error!("Failed to publish event to {}: {:?}", publisher.destination(), e);
            }
        });
    }
}

/// Typed front for the two downstream destinations.
#[derive(Clone)]
pub struct EventBus {
    emitter: Arc<dyn EventEmitter>,
    config: EventConfig,
}

impl EventBus {
    pub fn new(emitter: Arc<dyn EventEmitter>, config: EventConfig) -> Self {
        Self { emitter, config }
    }

    pub fn suggestion(&self, event: SuggestionEvent) {
        self.emit(&self.config.suggestion_queue, &event);
    }

    pub fn notification(&self, event: NotificationEvent) {
        self.emit(&self.config.notification_queue, &event);
    }

    fn emit<E: serde::Serialize>(&self, destination: &str, event: &E) {
        match serde_json::to_value(event) {
            Ok(payload) => self.emitter.publish(destination, payload),
            Err(e) => tracing::error!("Failed to serialize event for {}: {:?}", destination, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::RecordingEmitter;

    fn lazy_pool() -> deadpool_redis::Pool {
        deadpool_redis::Config::from_url("redis://127.0.0.1:6379")
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .unwrap()
    }

    #[actix_web::test]
    async fn registry_reuses_publishers_per_destination() {
        let registry = DestinationRegistry::new(lazy_pool());
        assert_eq!(registry.len(), 0);

        let a = registry.get_or_create("suggestion_queue");
        let b = registry.get_or_create("suggestion_queue");
        let c = registry.get_or_create("notification_queue");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);
        assert_eq!(c.destination(), "notification_queue");
    }

    #[test]
    fn bus_tags_events_and_routes_destinations() {
        let recorder = Arc::new(RecordingEmitter::default());
        let bus = EventBus::new(recorder.clone(), EventConfig::default());

        bus.suggestion(SuggestionEvent::DeleteRecruitment { id: 9 });

        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "suggestion_queue");
        assert_eq!(events[0].1["type"], "DELETE_RECRUITMENT");
        assert_eq!(events[0].1["id"], 9);
    }
}
