//! Persistence seam for conversation records.
//!
//! Trait-based abstraction over the external store that holds ciphertext
//! rows. The trait is synchronous (no async) to keep the state machine
//! layer free of runtime dependencies; an async backend adapts at the
//! boundary.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// A new record handed to the store on send.
///
/// The store assigns the timestamp on insert, mirroring a server-side
/// `created_at` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Encrypted message content, text-encoded.
    pub content: String,
    /// Participant id of the sender.
    pub sender_id: String,
    /// Participant id of the receiver.
    pub receiver_id: String,
}

/// A persisted conversation record.
///
/// Records are append-only: once stored they are never mutated. `content`
/// is opaque ciphertext; only a view holding the conversation secret can
/// read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Encrypted message content, text-encoded.
    pub content: String,
    /// Participant id of the sender.
    pub sender_id: String,
    /// Participant id of the receiver.
    pub receiver_id: String,
    /// Store-assigned timestamp (seconds).
    pub sent_at_secs: u64,
}

impl StoredMessage {
    /// True if this record belongs to the conversation between `a` and `b`,
    /// in either direction.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

/// Errors from the persistence seam.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store rejected a write.
    ///
    /// Retryable: the caller keeps the optimistically rendered plaintext
    /// and informs the user the message may not have been saved.
    #[error("write rejected: {reason}")]
    WriteRejected {
        /// Why the write was rejected.
        reason: String,
    },

    /// The store could not serve a history query.
    #[error("query failed: {reason}")]
    QueryFailed {
        /// Why the query failed.
        reason: String,
    },
}

/// Storage abstraction for conversation records.
///
/// Must be Clone (shared between an inbox and several open conversation
/// views), Send + Sync, and synchronous. Implementations typically share
/// internal state via Arc, so clones access the same underlying storage.
pub trait MessageStore: Clone + Send + Sync + 'static {
    /// Append a record, assigning its timestamp.
    ///
    /// Returns the stored form of the record.
    fn insert_message(&self, outgoing: OutgoingMessage) -> Result<StoredMessage, StoreError>;

    /// Load every record between two participants, oldest first.
    fn load_conversation(&self, a: &str, b: &str) -> Result<Vec<StoredMessage>, StoreError>;
}

/// In-memory store implementation for testing and simulation.
///
/// Uses a Vec in insert order with a monotonically increasing timestamp
/// per record. Thread-safe through a Mutex; uses `lock().expect()` which
/// will panic if the mutex is poisoned - acceptable for test code. A
/// failure switch lets tests exercise the rejected-write path.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    /// All records, in insert order.
    messages: Vec<StoredMessage>,
    /// Timestamp assigned to the next insert.
    next_sent_at_secs: u64,
    /// When set, every insert is rejected.
    fail_writes: bool,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                messages: Vec::new(),
                next_sent_at_secs: 1,
                fail_writes: false,
            })),
        }
    }

    /// Toggle rejection of all subsequent writes.
    #[allow(clippy::expect_used)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().expect("Mutex poisoned").fail_writes = fail;
    }

    /// Total number of stored records.
    #[allow(clippy::expect_used)]
    pub fn message_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").messages.len()
    }

    /// Insert a pre-built record verbatim, keeping its timestamp.
    ///
    /// Lets tests seed legacy or cross-conversation rows that the normal
    /// insert path would never produce.
    #[allow(clippy::expect_used)]
    pub fn seed_record(&self, record: StoredMessage) {
        self.inner.lock().expect("Mutex poisoned").messages.push(record);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore for MemoryStore {
    #[allow(clippy::expect_used)]
    fn insert_message(&self, outgoing: OutgoingMessage) -> Result<StoredMessage, StoreError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        if inner.fail_writes {
            return Err(StoreError::WriteRejected { reason: "store unavailable".to_string() });
        }

        let record = StoredMessage {
            content: outgoing.content,
            sender_id: outgoing.sender_id,
            receiver_id: outgoing.receiver_id,
            sent_at_secs: inner.next_sent_at_secs,
        };
        inner.next_sent_at_secs += 1;
        inner.messages.push(record.clone());

        Ok(record)
    }

    #[allow(clippy::expect_used)]
    fn load_conversation(&self, a: &str, b: &str) -> Result<Vec<StoredMessage>, StoreError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        let mut records: Vec<StoredMessage> =
            inner.messages.iter().filter(|m| m.involves(a, b)).cloned().collect();
        records.sort_by_key(|m| m.sent_at_secs);

        Ok(records)
    }
}
