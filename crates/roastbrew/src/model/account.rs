use serde::Serialize;

/// A registered customer. Keyed by normalised email; immutable once created.
#[derive(Clone)]
pub struct Account {
    pub email: String,
    pub full_name: String,
    /// PHC-format argon2 hash.
    pub password_hash: String,
}

impl Account {
    pub fn profile(&self) -> Profile {
        Profile {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Payload for creating an account. The password is already hashed.
#[derive(Clone)]
pub struct AccountCreate {
    pub full_name: String,
    pub password_hash: String,
}

impl std::fmt::Debug for AccountCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCreate")
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

/// The public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub email: String,
}
