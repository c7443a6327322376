//! Customer and staff email.
//!
//! - [`templates`]: renders each kind of mail from askama templates
//! - [`dispatcher::NotificationDispatcher`]: renders and sends, with a timeout
//! - [`queue::NotificationQueue`]: background delivery with retry and dead letters
//! - [`transport`]: SMTP, log-only and in-memory transports

pub mod dispatcher;
pub mod error;
pub mod queue;
pub mod templates;
pub mod transport;

pub use dispatcher::NotificationDispatcher;
pub use error::NotifyError;
pub use queue::{DeadLetter, Notification, NotificationQueue, RetryPolicy};
pub use templates::Letterhead;
pub use transport::{LogTransport, MailKind, MailTransport, MemoryTransport, OutboundMail, SmtpTransport};
