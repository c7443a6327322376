use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::order_id::OrderIdGenerator;
use super::service::{OrderLifecycleService, ServiceParts};
use crate::clients::{AccountDirectory, Inbox, InventoryStore, OrderLedger};
use crate::config::AppConfig;
use crate::model::{house_catalog, ProductCreate, ProductId};
use crate::notify::{
    Letterhead, LogTransport, MailTransport, NotificationDispatcher, NotificationQueue, NotifyError,
    RetryPolicy, SmtpTransport,
};
use crate::{account_actor, inbox_actor, inventory_actor, ledger_actor};

/// Starts, wires and stops every actor behind the storefront.
///
/// # Architecture
///
/// - **Inventory actor**: products and stock levels
/// - **Account actor**: customer accounts keyed by email
/// - **Ledger actor**: orders, run with the configured
///   [`StatusPolicy`](crate::model::StatusPolicy) as its context
/// - **Inbox actor**: contact-form messages
/// - **Notification worker**: drains the mail queue
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(&AppConfig::from_env()?).await?;
/// let service = system.service();
/// // ... hand `service` to the HTTP router ...
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    service: OrderLifecycleService,
    actor_handles: Vec<JoinHandle<()>>,
    notifier_handle: JoinHandle<()>,
}

impl OrderSystem {
    /// Starts the system with the transport the configuration asks for and
    /// the house catalogue loaded.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay settings cannot be turned into a transport.
    pub async fn start(config: &AppConfig) -> Result<Self, NotifyError> {
        let transport: Arc<dyn MailTransport> = match &config.mail.smtp {
            Some(smtp) => {
                info!(host = %smtp.host, port = smtp.port, "Using SMTP relay");
                Arc::new(SmtpTransport::new(smtp)?)
            }
            None => {
                warn!("SMTP_HOST not set; outgoing mail will only be logged");
                Arc::new(LogTransport)
            }
        };
        Ok(Self::start_with(config, transport, house_catalog()).await)
    }

    /// Starts the system with an explicit transport and opening catalogue.
    pub async fn start_with(
        config: &AppConfig,
        transport: Arc<dyn MailTransport>,
        catalog: Vec<(ProductId, ProductCreate)>,
    ) -> Self {
        // 1. Create actors
        let (inventory_actor, inventory_client) = inventory_actor::new();
        let (account_actor, account_client) = account_actor::new();
        let (ledger_actor, ledger_client) = ledger_actor::new();
        let (inbox_actor, inbox_client) = inbox_actor::new();

        // 2. Start them with their contexts
        let actor_handles = vec![
            tokio::spawn(inventory_actor.run(())),
            tokio::spawn(account_actor.run(())),
            tokio::spawn(ledger_actor.run(config.orders.status_policy)),
            tokio::spawn(inbox_actor.run(())),
        ];

        let inventory = InventoryStore::new(inventory_client);
        for (id, product) in catalog {
            if let Err(e) = inventory.add_product(id.clone(), product).await {
                warn!(product = %id, error = %e, "Skipping catalogue entry");
            }
        }

        // 3. Mail
        let dispatcher = NotificationDispatcher::new(
            transport,
            Letterhead::from_config(&config.mail),
            config.mail.send_timeout,
        );
        let policy = RetryPolicy {
            max_attempts: config.mail.max_attempts,
            base_delay: config.mail.retry_base,
            ..RetryPolicy::default()
        };
        let (notifications, notifier_handle) =
            NotificationQueue::start(dispatcher.clone(), policy, config.mail.queue_capacity);

        let service = OrderLifecycleService::new(ServiceParts {
            inventory,
            accounts: AccountDirectory::new(account_client),
            ledger: OrderLedger::new(ledger_client),
            inbox: Inbox::new(inbox_client),
            dispatcher,
            notifications,
            order_ids: OrderIdGenerator::new(&config.orders.id_prefix),
            shipping_fee: config.orders.shipping_fee,
        });

        info!(
            status_policy = ?config.orders.status_policy,
            shipping_fee = %config.orders.shipping_fee,
            "Order system started"
        );

        Self {
            service,
            actor_handles,
            notifier_handle,
        }
    }

    /// A handle on the running system.
    pub fn service(&self) -> OrderLifecycleService {
        self.service.clone()
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Every [`OrderLifecycleService`] clone handed out must be dropped first;
    /// the actors exit once their last client is gone. The notification worker
    /// finishes its backlog before the actors are awaited.
    ///
    /// # Errors
    ///
    /// Returns error if any task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order system...");

        drop(self.service);

        if let Err(e) = self.notifier_handle.await {
            error!("Notification worker failed: {:?}", e);
            return Err(format!("Notification worker failed: {e:?}"));
        }

        for handle in self.actor_handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {e:?}"));
            }
        }

        info!("Order system shutdown complete.");
        Ok(())
    }
}
