use std::sync::Mutex;

use async_trait::async_trait;
use fleet_log::RequestContext;

use super::{BlockingConsumer, Message};
use crate::errors::{Result, ServiceError};

/// In-memory message store, optionally bounded.
///
/// A batch that would exceed the bound is rejected whole.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    messages: Mutex<Vec<Message>>,
    capacity: Option<usize>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl BlockingConsumer for MemoryWriter {
    async fn consume_blocking(&self, _ctx: &RequestContext, messages: &[Message]) -> Result<()> {
        if let Some(m) = messages.iter().find(|m| m.channel.is_empty()) {
            return Err(ServiceError::Malformed(format!(
                "message from {:?} has no channel",
                m.publisher
            )));
        }
        let mut stored = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cap) = self.capacity {
            if stored.len() + messages.len() > cap {
                return Err(ServiceError::Storage(format!(
                    "capacity of {cap} messages exceeded"
                )));
            }
        }
        stored.extend_from_slice(messages);
        Ok(())
    }
}
