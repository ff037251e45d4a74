//! FIFO of selected targets consumed by the next client operation.

use super::error::{RedditClientError, Result};
use crate::models::EntityKind;
use log::debug;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, Mutex};

pub const QUEUE_CAPACITY: usize = 32;

/// A target chosen for the next operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub kind: EntityKind,
}

impl Selection {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The logged-in account.
    pub fn me() -> Self {
        Self::new("me", EntityKind::Redditor)
    }

    /// Validate this selection for `operation`.
    pub fn check(self, operation: &'static str, expected: &[EntityKind]) -> Result<Self> {
        if self.name.is_empty() {
            return Err(RedditClientError::NoTargetSelected);
        }
        if !expected.contains(&self.kind) {
            return Err(RedditClientError::InvalidTarget {
                operation,
                expected: expected.to_vec(),
                found: self.kind,
            });
        }
        Ok(self)
    }
}

/// Bounded selection queue. `select` waits while the queue is full.
pub struct SelectionQueue {
    tx: mpsc::Sender<Selection>,
    rx: Mutex<mpsc::Receiver<Selection>>,
}

impl Default for SelectionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    pub async fn select(&self, selection: Selection) {
        debug!("selecting {} {:?}", selection.kind, selection.name);
        // The receiver lives as long as the queue, so the send cannot fail.
        let _ = self.tx.send(selection).await;
    }

    /// Pop the oldest selection. Fails instead of blocking when empty.
    pub async fn dequeue(&self) -> Result<Selection> {
        match self.rx.lock().await.try_recv() {
            Ok(selection) => Ok(selection),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                Err(RedditClientError::NoTargetSelected)
            }
        }
    }

    /// Pop the oldest selection and check it against `expected`.
    pub async fn check_type(
        &self,
        operation: &'static str,
        expected: &[EntityKind],
    ) -> Result<Selection> {
        self.dequeue().await?.check(operation, expected)
    }

    pub fn len(&self) -> usize {
        QUEUE_CAPACITY - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
