use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg_{}", self.0)
    }
}

/// A message left through the storefront contact form.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    #[serde(skip)]
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "date")]
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ContactCreate {
    pub name: String,
    pub email: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}
