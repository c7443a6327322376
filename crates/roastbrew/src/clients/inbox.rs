//! # Contact Inbox Client
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use crate::inbox_actor::InboxError;
use crate::model::{ContactCreate, ContactMessage, MessageId};

#[derive(Clone)]
pub struct Inbox {
    inner: ResourceClient<ContactMessage>,
    next_id: Arc<AtomicU64>,
}

#[async_trait]
impl ActorClient<ContactMessage> for Inbox {
    type Error = InboxError;

    fn inner(&self) -> &ResourceClient<ContactMessage> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<InboxError>() {
            Ok(inner) => inner,
            Err(other) => InboxError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl Inbox {
    pub fn new(inner: ResourceClient<ContactMessage>) -> Self {
        Self {
            inner,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Stores a message stamped with the current time.
    #[instrument(skip(self, message))]
    pub async fn record(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactMessage, InboxError> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let params = ContactCreate {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
            received_at: Utc::now(),
        };
        self.inner
            .create(id, params)
            .await
            .map_err(Self::map_error)?;
        self.get(id)
            .await?
            .ok_or_else(|| InboxError::ActorCommunicationError(format!("{id} vanished after insert")))
    }

    /// Every stored message, newest first.
    pub async fn messages(&self) -> Result<Vec<ContactMessage>, InboxError> {
        let mut messages = self.list().await?;
        messages.reverse();
        Ok(messages)
    }
}
