//! Logging middleware behaviour for session handlers and message consumers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fleet_log::{BufferSink, Level, Logger, RequestContext};
use fleet_services::consumers::{
    self, AsyncConsumer, BlockingConsumer, MemoryWriter, Message,
};
use fleet_services::messaging::{self, Handler};
use fleet_services::{Result, ServiceError};

fn logger() -> (Logger, BufferSink) {
    let buf = BufferSink::new();
    (Logger::with_level(buf.sink(), Level::Info), buf)
}

// ---------------------------------------------------------------------------
// Session handler
// ---------------------------------------------------------------------------

/// Records which hooks ran; rejects publishes to `forbidden/#` and rewrites
/// subscriptions under a tenant prefix.
#[derive(Default)]
struct RecordingHandler {
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingHandler {
    fn hit(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn auth_connect(&self, _: &RequestContext) -> Result<()> {
        self.hit("auth_connect");
        Ok(())
    }

    async fn auth_publish(&self, _: &RequestContext, topic: &mut String, _: &mut Vec<u8>) -> Result<()> {
        self.hit("auth_publish");
        if topic.starts_with("forbidden/") {
            return Err(ServiceError::Authorization);
        }
        Ok(())
    }

    async fn auth_subscribe(&self, _: &RequestContext, topics: &mut Vec<String>) -> Result<()> {
        self.hit("auth_subscribe");
        for t in topics.iter_mut() {
            *t = format!("tenant-1/{t}");
        }
        Ok(())
    }

    async fn connect(&self, _: &RequestContext) -> Result<()> {
        self.hit("connect");
        Ok(())
    }

    async fn disconnect(&self, _: &RequestContext) -> Result<()> {
        self.hit("disconnect");
        Ok(())
    }

    async fn publish(&self, _: &RequestContext, _: &mut String, payload: &mut Vec<u8>) -> Result<()> {
        self.hit("publish");
        payload.extend_from_slice(b"!");
        Ok(())
    }

    async fn subscribe(&self, _: &RequestContext, _: &mut Vec<String>) -> Result<()> {
        self.hit("subscribe");
        Ok(())
    }

    async fn unsubscribe(&self, _: &RequestContext, _: &mut Vec<String>) -> Result<()> {
        self.hit("unsubscribe");
        Ok(())
    }
}

#[tokio::test]
async fn every_hook_is_delegated_and_logged_once() {
    let (logger, buf) = logger();
    let inner = Arc::new(RecordingHandler::default());
    let handler = messaging::logging_middleware(inner.clone(), logger);
    let ctx = RequestContext::new();

    let mut topic = "channels/c-1/messages".to_string();
    let mut payload = b"23.5".to_vec();
    let mut topics = vec!["channels/c-1/messages".to_string()];

    handler.auth_connect(&ctx).await.unwrap();
    handler.connect(&ctx).await.unwrap();
    handler.auth_publish(&ctx, &mut topic, &mut payload).await.unwrap();
    handler.publish(&ctx, &mut topic, &mut payload).await.unwrap();
    handler.auth_subscribe(&ctx, &mut topics).await.unwrap();
    handler.subscribe(&ctx, &mut topics).await.unwrap();
    handler.unsubscribe(&ctx, &mut topics).await.unwrap();
    handler.disconnect(&ctx).await.unwrap();

    assert_eq!(
        inner.calls(),
        vec![
            "auth_connect",
            "connect",
            "auth_publish",
            "publish",
            "auth_subscribe",
            "subscribe",
            "unsubscribe",
            "disconnect"
        ]
    );
    assert_eq!(payload, b"23.5!".to_vec(), "handler mutations reach the caller");
    assert_eq!(topics, vec!["tenant-1/channels/c-1/messages".to_string()]);

    let records = buf.records().unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records[0]["msg"], "AuthConnect() completed successfully");
    assert!(records[0].get("topics").is_none());
    assert_eq!(records[2]["msg"], "AuthPublish() completed successfully");
    assert_eq!(records[2]["topics"], serde_json::json!(["channels/c-1/messages"]));
    // Topics are logged as the client sent them, before the rewrite.
    assert_eq!(records[4]["topics"], serde_json::json!(["channels/c-1/messages"]));
    assert_eq!(records[5]["topics"], serde_json::json!(["tenant-1/channels/c-1/messages"]));
    assert_eq!(records[7]["msg"], "Disconnect() completed successfully");
}

#[tokio::test]
async fn rejected_publish_is_forwarded() {
    let (logger, buf) = logger();
    let handler = messaging::logging_middleware(Arc::new(RecordingHandler::default()), logger);

    let mut topic = "forbidden/x".to_string();
    let err = handler
        .auth_publish(&RequestContext::new(), &mut topic, &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Authorization);

    let r = &buf.records().unwrap()[0];
    assert_eq!(r["level"], "warn");
    assert_eq!(r["msg"], "AuthPublish() failed to complete successfully");
    assert_eq!(r["topics"], serde_json::json!(["forbidden/x"]));
    assert_eq!(r["error"], "not authorized to perform the operation");
}

// ---------------------------------------------------------------------------
// Consumers
// ---------------------------------------------------------------------------

fn batch(n: usize) -> Vec<Message> {
    (0..n)
        .map(|i| Message {
            channel: "c-1".into(),
            publisher: format!("t-{i}"),
            protocol: "mqtt".into(),
            payload: serde_json::json!({"v": i}),
            ..Message::default()
        })
        .collect()
}

#[tokio::test]
async fn blocking_consumer_logs_batch_size_and_storage_errors() {
    let (logger, buf) = logger();
    let writer = Arc::new(MemoryWriter::bounded(3));
    let repo = consumers::logging_middleware(writer.clone(), logger);
    let ctx = RequestContext::new();

    repo.consume_blocking(&ctx, &batch(2)).await.unwrap();
    let err = repo.consume_blocking(&ctx, &batch(2)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert_eq!(writer.len(), 2);

    let records = buf.records().unwrap();
    assert_eq!(records[0]["msg"], "Consume blocking completed successfully");
    assert_eq!(records[0]["messages"], 2);
    assert_eq!(records[1]["level"], "warn");
    assert_eq!(records[1]["messages"], 2);
    assert_eq!(records[1]["error"], err.to_string());
}

struct QueueConsumer {
    queued: Mutex<usize>,
}

#[async_trait]
impl AsyncConsumer for QueueConsumer {
    async fn consume_async(&self, _: &RequestContext, messages: &[Message]) -> Result<()> {
        *self.queued.lock().unwrap() += messages.len();
        Ok(())
    }
}

#[tokio::test]
async fn async_consumer_is_logged() {
    let (logger, buf) = logger();
    let inner = Arc::new(QueueConsumer {
        queued: Mutex::new(0),
    });
    let repo = consumers::async_logging_middleware(inner.clone(), logger);

    repo.consume_async(&RequestContext::new(), &batch(5)).await.unwrap();

    assert_eq!(*inner.queued.lock().unwrap(), 5);
    let r = &buf.records().unwrap()[0];
    assert_eq!(r["msg"], "Consume async completed successfully");
    assert_eq!(r["messages"], 5);
}
