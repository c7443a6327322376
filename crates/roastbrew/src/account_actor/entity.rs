//! [`ActorEntity`] implementation for [`Account`].
//!
//! Accounts are write-once: there are no updates or actions, so both use
//! [`Infallible`] and can never be sent.

use std::convert::Infallible;

use actor_framework::ActorEntity;
use async_trait::async_trait;

use super::error::AccountError;
use crate::model::{Account, AccountCreate};

#[async_trait]
impl ActorEntity for Account {
    type Id = String;
    type Create = AccountCreate;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = AccountError;

    fn from_create_params(email: String, params: AccountCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            email,
            full_name: params.full_name,
            password_hash: params.password_hash,
        })
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), Self::Error> {
        if self.email.is_empty() {
            return Err(AccountError::MissingField("email"));
        }
        if self.full_name.trim().is_empty() {
            return Err(AccountError::MissingField("fullName"));
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
