//! Mail transports.
//!
//! [`SmtpTransport`] relays through a real server with lettre,
//! [`LogTransport`] only writes the envelope to the log (used when no relay is
//! configured) and [`MemoryTransport`] records messages for tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use tracing::info;

use super::error::NotifyError;
use crate::config::SmtpConfig;

/// What a message is about; lets tests and logs tell mails apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    OrderConfirmation,
    OutForDelivery,
    Delivered,
    Welcome,
    ContactAdminCopy,
    ContactAutoReply,
}

/// A fully rendered message.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMail {
    pub kind: MailKind,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Something that can deliver an [`OutboundMail`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError>;
}

/// SMTP relay via lettre with STARTTLS.
#[derive(Clone)]
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// # Errors
    ///
    /// Returns error if the relay host cannot be resolved into a transport.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                mail.from
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(mail.from.clone()))?,
            )
            .to(mail
                .to
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(mail.to.clone()))?)
            .subject(mail.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(mail.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(mail.html.clone()),
                    ),
            )?;

        self.mailer.send(email).await?;

        info!(to = %mail.to, subject = %mail.subject, "Email sent successfully");
        Ok(())
    }
}

/// Logs mail instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        info!(
            kind = ?mail.kind,
            to = %mail.to,
            subject = %mail.subject,
            "No SMTP relay configured; mail logged only"
        );
        Ok(())
    }
}

/// Records every delivered message in memory.
///
/// Failures can be scripted with [`fail_next`](Self::fail_next) or
/// [`set_failing`](Self::set_failing), and a delay with
/// [`with_delay`](Self::with_delay) to exercise send timeouts.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<OutboundMail>>>,
    attempts: Arc<AtomicU32>,
    fail_remaining: Arc<AtomicU32>,
    failing: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The next `n` sends fail.
    pub fn fail_next(&self, n: u32) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    /// Every send fails until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn sent_of(&self, kind: MailKind) -> Vec<OutboundMail> {
        self.sent().into_iter().filter(|m| m.kind == kind).collect()
    }

    /// Send calls so far, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted_failure = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted_failure || self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected(format!("refused mail to {}", mail.to)));
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mail.clone());
        Ok(())
    }
}
