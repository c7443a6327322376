//! # Account Directory
//!
//! Registration and sign-in over the account actor. Passwords are hashed with
//! argon2id on the blocking pool before anything is sent to the actor; the raw
//! password never leaves this module.
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use tracing::{info, instrument};

use crate::account_actor::AccountError;
use crate::model::{normalize_email, Account, AccountCreate, Profile};

#[derive(Clone)]
pub struct AccountDirectory {
    inner: ResourceClient<Account>,
}

#[async_trait]
impl ActorClient<Account> for AccountDirectory {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<AccountError>() {
            Ok(inner) => inner,
            Err(FrameworkError::NotFound(email)) => AccountError::NotFound(email),
            Err(FrameworkError::AlreadyExists(email)) => AccountError::EmailTaken(email),
            Err(other) => AccountError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl AccountDirectory {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }

    /// Creates an account and returns its public profile.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Profile, AccountError> {
        let full_name = full_name.trim();
        let email = normalize_email(email);
        if full_name.is_empty() {
            return Err(AccountError::MissingField("fullName"));
        }
        if email.is_empty() {
            return Err(AccountError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        // Cheap early exit; the actor's key check stays authoritative.
        if self.get(email.clone()).await?.is_some() {
            return Err(AccountError::EmailTaken(email));
        }

        let password_hash = hash_password(password.to_string()).await?;
        self.inner
            .create(
                email.clone(),
                AccountCreate {
                    full_name: full_name.to_string(),
                    password_hash,
                },
            )
            .await
            .map_err(Self::map_error)?;

        info!(%email, "Account registered");
        Ok(Profile {
            full_name: full_name.to_string(),
            email,
        })
    }

    /// Verifies credentials and returns the profile.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Profile, AccountError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AccountError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        let account = self
            .get(email.clone())
            .await?
            .ok_or(AccountError::NotFound(email))?;

        verify_password(password.to_string(), account.password_hash.clone()).await?;
        Ok(account.profile())
    }

    /// Profile for `email`, if registered.
    pub async fn find(&self, email: &str) -> Result<Option<Profile>, AccountError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(None);
        }
        Ok(self.get(email).await?.map(|account| account.profile()))
    }
}

async fn hash_password(password: String) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccountError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AccountError::Hashing(e.to_string()))?
}

async fn verify_password(password: String, stored_hash: String) -> Result<(), AccountError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash).map_err(|e| AccountError::Hashing(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AccountError::WrongPassword)
    })
    .await
    .map_err(|e| AccountError::Hashing(e.to_string()))?
}
