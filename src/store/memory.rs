use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ConversationStore;
use crate::models::chat::{ Conversation, Message };

struct Entry {
    meta: Conversation,
    messages: Vec<Message>,
}

/// In-process conversation store backing a single-user deployment.
pub struct MemoryConversationStore {
    inner: RwLock<HashMap<String, Entry>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn create(&self, title: &str) -> Conversation {
        let meta = Conversation {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: Utc::now().timestamp_millis(),
        };
        let mut inner = self.inner.write().await;
        inner.insert(meta.id.clone(), Entry {
            meta: meta.clone(),
            messages: Vec::new(),
        });
        meta
    }

    async fn delete(&self, id: &str) -> bool {
        self.inner.write().await.remove(id).is_some()
    }

    async fn list(&self) -> Vec<Conversation> {
        let inner = self.inner.read().await;
        let mut conversations: Vec<Conversation> = inner
            .values()
            .map(|entry| entry.meta.clone())
            .collect();
        conversations.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
        });
        conversations
    }

    async fn append(&self, id: &str, message: Message) -> bool {
        let mut inner = self.inner.write().await;
        match inner.get_mut(id) {
            Some(entry) => {
                entry.messages.push(message);
                true
            }
            None => false,
        }
    }

    async fn messages(&self, id: &str) -> Option<Vec<Message>> {
        let inner = self.inner.read().await;
        inner.get(id).map(|entry| {
            entry.messages
                .iter()
                .filter(|m| !m.placeholder)
                .cloned()
                .collect()
        })
    }
}
