mod memory;
pub mod debounce;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

use crate::models::chat::{ ClipboardRecord, Conversation, Message };

pub use self::debounce::Debouncer;
pub use self::memory::MemoryConversationStore;

/// Shared clipboard record with last-write-wins semantics. Every
/// committed write is delivered to all live subscribers.
pub struct ClipboardStore {
    tx: watch::Sender<ClipboardRecord>,
}

impl ClipboardStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ClipboardRecord::default());
        Self { tx }
    }

    pub fn get(&self) -> ClipboardRecord {
        self.tx.borrow().clone()
    }

    pub fn put(&self, record: ClipboardRecord) {
        self.tx.send_replace(record);
    }

    /// Receiver that yields the current record first, then every
    /// subsequent committed write.
    pub fn subscribe(&self) -> watch::Receiver<ClipboardRecord> {
        self.tx.subscribe()
    }
}

impl Default for ClipboardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Conversation persistence consumed by the HTTP API. Conversations are
/// created and deleted whole; messages are append-only and reads must
/// exclude transient placeholder entries.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create(&self, title: &str) -> Conversation;

    async fn delete(&self, id: &str) -> bool;

    async fn list(&self) -> Vec<Conversation>;

    async fn append(&self, id: &str, message: Message) -> bool;

    async fn messages(&self, id: &str) -> Option<Vec<Message>>;
}

pub fn new_conversation_store() -> Arc<dyn ConversationStore> {
    info!("Conversations will be stored in: memory");
    Arc::new(MemoryConversationStore::new())
}
