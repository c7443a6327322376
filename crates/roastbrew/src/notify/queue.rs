//! # Notification Queue
//!
//! Order confirmations, status notices and welcome mail go out in the
//! background so a slow relay never holds up an HTTP response.
//!
//! A single worker drains a bounded channel one notification at a time,
//! retrying each with exponential backoff. Notifications that exhaust their
//! attempts are parked as [`DeadLetter`]s for staff to inspect.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::dispatcher::NotificationDispatcher;
use super::error::NotifyError;
use crate::model::{Order, OrderStatus, Profile};

/// Work item for the queue.
#[derive(Debug, Clone)]
pub enum Notification {
    OrderConfirmation(Order),
    StatusUpdate { order: Order, status: OrderStatus },
    Welcome(Profile),
}

impl Notification {
    pub fn label(&self) -> String {
        match self {
            Notification::OrderConfirmation(order) => format!("order confirmation {}", order.id),
            Notification::StatusUpdate { order, status } => {
                format!("status update {} ({status})", order.id)
            }
            Notification::Welcome(_) => "welcome".to_string(),
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Notification::OrderConfirmation(order) | Notification::StatusUpdate { order, .. } => {
                &order.customer_email
            }
            Notification::Welcome(profile) => &profile.email,
        }
    }
}

/// Backoff schedule: `base_delay * 2^(attempt - 1)`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Pause after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// A notification that could not be delivered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetter {
    pub notification: String,
    pub recipient: String,
    pub attempts: u32,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

enum Command {
    Deliver(Notification),
    Flush(oneshot::Sender<()>),
}

/// Handle for enqueueing notifications. Cheap to clone.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<Command>,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
}

impl NotificationQueue {
    /// Spawns the worker. It stops once every queue handle is dropped and the
    /// backlog has been drained.
    pub fn start(
        dispatcher: NotificationDispatcher,
        policy: RetryPolicy,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let dead_letters = Arc::new(Mutex::new(Vec::new()));
        let worker = Worker {
            receiver,
            dispatcher,
            policy,
            dead_letters: dead_letters.clone(),
        };
        let handle = tokio::spawn(worker.run());
        (
            Self {
                sender,
                dead_letters,
            },
            handle,
        )
    }

    /// Queues a notification without waiting.
    ///
    /// # Errors
    ///
    /// [`NotifyError::QueueFull`] when the backlog is at capacity,
    /// [`NotifyError::QueueClosed`] when the worker has stopped.
    pub fn enqueue(&self, notification: Notification) -> Result<(), NotifyError> {
        debug!(notification = %notification.label(), "Enqueue");
        self.sender
            .try_send(Command::Deliver(notification))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => NotifyError::QueueClosed,
            })
    }

    /// Waits until everything enqueued before this call has been delivered or
    /// dead-lettered.
    pub async fn flush(&self) -> Result<(), NotifyError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::Flush(tx))
            .await
            .map_err(|_| NotifyError::QueueClosed)?;
        rx.await.map_err(|_| NotifyError::QueueClosed)
    }

    /// Undeliverable notifications, oldest first.
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

struct Worker {
    receiver: mpsc::Receiver<Command>,
    dispatcher: NotificationDispatcher,
    policy: RetryPolicy,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
}

impl Worker {
    async fn run(mut self) {
        info!(max_attempts = self.policy.max_attempts, "Notification worker started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                Command::Deliver(notification) => self.deliver(notification).await,
                Command::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }

        info!("Notification worker shutdown");
    }

    async fn deliver(&self, notification: Notification) {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.send_once(&notification).await {
                Ok(()) => return,
                Err(e) if attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        notification = %notification.label(),
                        attempt,
                        ?delay,
                        error = %e,
                        "Notification attempt failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        notification = %notification.label(),
                        attempts = attempt,
                        error = %e,
                        "Notification dead-lettered"
                    );
                    self.dead_letters
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(DeadLetter {
                            notification: notification.label(),
                            recipient: notification.recipient().to_string(),
                            attempts: attempt,
                            error: e.to_string(),
                            failed_at: Utc::now(),
                        });
                    return;
                }
            }
        }
    }

    async fn send_once(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification {
            Notification::OrderConfirmation(order) => {
                self.dispatcher.send_order_confirmation(order).await
            }
            Notification::StatusUpdate { order, status } => self
                .dispatcher
                .send_status_update(order, *status)
                .await
                .map(|_| ()),
            Notification::Welcome(profile) => self.dispatcher.send_welcome(profile).await,
        }
    }
}
