//! Shared application state for the Haulwise server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds no per-request data.

use std::sync::Arc;

use haulwise_core::DemoRequestService;
use haulwise_mail::{MailTransport, MemoryTransport, ResendTransport};
use tracing::{error, info, warn};

use crate::config::{MailConfig, ServerConfig};

/// Shared application state passed to all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Demo-request relay. `None` when the mail credential is missing.
    pub intake: Option<DemoRequestService>,
}

impl AppState {
    /// Build the state described by `config`.
    ///
    /// A missing provider credential is reported here, once, and leaves the
    /// intake endpoint disabled rather than preventing startup.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let transport: Option<Arc<dyn MailTransport>> = match &config.mail {
            MailConfig::Resend {
                api_key: Some(key),
                base_url,
            } => {
                let transport = ResendTransport::new(key.clone(), base_url);
                info!(endpoint = %transport.endpoint(), "using Resend mail transport");
                Some(Arc::new(transport))
            }
            MailConfig::Resend { api_key: None, .. } => {
                error!("RESEND_API_KEY is not set; demo requests will be rejected");
                None
            }
            MailConfig::Memory => {
                warn!("using in-memory mail transport (emails are logged, not delivered)");
                Some(Arc::new(MemoryTransport::discarding()))
            }
        };

        Self {
            intake: transport
                .map(|t| DemoRequestService::new(t, config.addresses.clone())),
        }
    }
}
