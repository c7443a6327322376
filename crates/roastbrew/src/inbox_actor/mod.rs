//! # Inbox Actor
//!
//! Stores contact-form messages for the admin dashboard. Messages are
//! write-once, so the entity has neither updates nor actions.

use std::convert::Infallible;

use actor_framework::{ActorEntity, ResourceActor, ResourceClient};
use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ContactCreate, ContactMessage, MessageId};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InboxError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for InboxError {
    fn from(msg: String) -> Self {
        InboxError::ActorCommunicationError(msg)
    }
}

#[async_trait]
impl ActorEntity for ContactMessage {
    type Id = MessageId;
    type Create = ContactCreate;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = InboxError;

    fn from_create_params(id: MessageId, params: ContactCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            message: params.message,
            received_at: params.received_at,
        })
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), Self::Error> {
        for (field, value) in [("name", &self.name), ("email", &self.email), ("message", &self.message)] {
            if value.trim().is_empty() {
                return Err(InboxError::MissingField(field));
            }
        }
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}

/// Creates a new inbox actor and its client.
pub fn new() -> (ResourceActor<ContactMessage>, ResourceClient<ContactMessage>) {
    ResourceActor::new(32)
}
