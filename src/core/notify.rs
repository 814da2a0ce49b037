//! Notification delivery
//!
//! Domain writes enqueue plain-text emails into the `notifications` outbox
//! table inside their own transactions; the [`OutboxWorker`] drains the
//! table independently, so a slow or dead mail server never delays an HTTP
//! response. Each row gets exactly one delivery attempt: failures are
//! recorded on the row and logged, never retried and never surfaced to the
//! original caller.

use crate::core::config::{OutboxConfig, SmtpConfig};
use crate::core::error::{BoomError, Result};
use crate::db::models::Notification;
use crate::db::repository::NotificationRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

/// Transport seam for outbound mail
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one plain-text message
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// SMTP mailer backed by lettre's async transport (STARTTLS)
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(host: String, config: &SmtpConfig) -> Self {
        Self {
            host,
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            from_address: config.from_address.clone(),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| BoomError::NotificationError(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| BoomError::NotificationError(format!("Invalid recipient: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| BoomError::NotificationError(format!("Failed to build email: {}", e)))?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| BoomError::NotificationError(format!("SMTP relay error: {}", e)))?
            .port(self.port);

        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer
            .send(email)
            .await
            .map_err(|e| BoomError::NotificationError(format!("SMTP send error: {}", e)))?;

        Ok(())
    }
}

/// Mailer used when no SMTP host is configured. Logs the delivery and
/// reports success so outbox rows still progress to `sent`.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        debug!(to = to, subject = subject, "Email delivery disabled, dropping message");
        Ok(())
    }
}

/// Build the mailer matching the SMTP configuration
pub fn build_mailer(config: &SmtpConfig) -> Arc<dyn Mailer> {
    match &config.host {
        Some(host) => Arc::new(SmtpMailer::new(host.clone(), config)),
        None => {
            warn!("SMTP host not configured, outbound email is disabled");
            Arc::new(NoopMailer)
        }
    }
}

/// Background worker draining the notification outbox
pub struct OutboxWorker {
    repo: Arc<NotificationRepository>,
    mailer: Arc<dyn Mailer>,
    poll_interval: Duration,
    batch_size: usize,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: RwLock<mpsc::Receiver<()>>,
}

impl OutboxWorker {
    pub fn new(
        repo: Arc<NotificationRepository>,
        mailer: Arc<dyn Mailer>,
        config: &OutboxConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            repo,
            mailer,
            poll_interval: Duration::from_secs(config.poll_interval),
            batch_size: config.batch_size,
            shutdown_tx,
            shutdown_rx: RwLock::new(shutdown_rx),
        }
    }

    /// Run the worker loop until shutdown
    pub async fn start(self: Arc<Self>) {
        info!("Notification outbox worker started");

        let mut shutdown_rx = {
            let mut guard = self.shutdown_rx.write().await;
            std::mem::replace(&mut *guard, mpsc::channel(1).1)
        };

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Notification outbox worker shutting down");
                    break;
                }
                _ = self.tick() => {}
            }
        }
    }

    /// Request worker shutdown
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    async fn tick(&self) {
        match self.drain_once().await {
            // Nothing queued, back off until the next poll
            Ok(0) => tokio::time::sleep(self.poll_interval).await,
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Failed to drain notification outbox");
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }

    /// Deliver one batch of pending notifications. Every row gets a single
    /// attempt; the outcome is recorded on the row either way.
    pub async fn drain_once(&self) -> Result<usize> {
        let pending = self.repo.find_pending(self.batch_size).await?;
        let count = pending.len();

        for notification in pending {
            self.deliver(&notification).await?;
        }

        Ok(count)
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        match self
            .mailer
            .send(&notification.recipient, &notification.subject, &notification.body)
            .await
        {
            Ok(()) => {
                self.repo.mark_sent(&notification.id).await?;
                info!(
                    notification_id = %notification.id,
                    recipient = %notification.recipient,
                    "Notification email sent"
                );
            }
            Err(e) => {
                warn!(
                    notification_id = %notification.id,
                    recipient = %notification.recipient,
                    error = %e,
                    "Notification email failed"
                );
                self.repo.mark_failed(&notification.id, &e.to_string()).await?;
            }
        }
        Ok(())
    }
}
