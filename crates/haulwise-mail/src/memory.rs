//! In-memory mail transport for testing and local development.
//!
//! Nothing leaves the process. Every attempted message is recorded in call
//! order, and individual calls can be scripted to fail so callers can
//! exercise their error paths deterministically. A [`MemoryTransport::discarding`]
//! transport only logs what it is given, for long-running local servers.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{MailError, MailTransport, MessageId, OutboundEmail};

#[derive(Debug, Default)]
struct Outbox {
    calls: usize,
    attempts: Vec<OutboundEmail>,
    delivered: Vec<OutboundEmail>,
    failures: HashMap<usize, MailError>,
}

/// A mail transport that keeps messages in memory.
///
/// Clones share the same outbox, so a test can hand one clone to the code
/// under test and inspect the other.
///
/// # Examples
///
/// ```
/// # use haulwise_mail::{MailError, MailTransport, MemoryTransport, OutboundEmail};
/// # #[tokio::main]
/// # async fn main() {
/// let transport = MemoryTransport::new();
/// transport
///     .fail_on(1, MailError::Transport { reason: "offline".to_owned() })
///     .await;
///
/// let email = OutboundEmail {
///     from: "demo@haulwise.io".to_owned(),
///     to: vec!["sales@haulwise.io".to_owned()],
///     subject: "hi".to_owned(),
///     html: "<p>hi</p>".to_owned(),
///     reply_to: None,
/// };
/// assert!(transport.send(&email).await.is_ok());
/// assert!(transport.send(&email).await.is_err());
/// assert_eq!(transport.attempts().await.len(), 2);
/// assert_eq!(transport.delivered().await.len(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    outbox: Arc<RwLock<Outbox>>,
    discard: bool,
}

impl MemoryTransport {
    /// Create a transport with an empty outbox and no scripted failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that logs each message and keeps none of them.
    ///
    /// [`attempts`](Self::attempts) and [`delivered`](Self::delivered) stay
    /// empty. Scripted failures still apply.
    #[must_use]
    pub fn discarding() -> Self {
        Self {
            discard: true,
            ..Self::default()
        }
    }

    /// Make the call with the given zero-based index fail with `error`.
    pub async fn fail_on(&self, call_index: usize, error: MailError) {
        self.outbox.write().await.failures.insert(call_index, error);
    }

    /// Every message handed to [`MailTransport::send`], including failed ones.
    pub async fn attempts(&self) -> Vec<OutboundEmail> {
        self.outbox.read().await.attempts.clone()
    }

    /// Only the messages that were accepted.
    pub async fn delivered(&self) -> Vec<OutboundEmail> {
        self.outbox.read().await.delivered.clone()
    }
}

#[async_trait::async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<MessageId, MailError> {
        let mut outbox = self.outbox.write().await;
        let index = outbox.calls;
        outbox.calls += 1;
        info!(to = ?email.to, subject = %email.subject, "email captured in memory");
        debug!(html = %email.html, "captured email body");

        if !self.discard {
            outbox.attempts.push(email.clone());
        }
        if let Some(err) = outbox.failures.remove(&index) {
            return Err(err);
        }
        if !self.discard {
            outbox.delivered.push(email.clone());
        }
        Ok(MessageId(format!("mem-{index}")))
    }
}
