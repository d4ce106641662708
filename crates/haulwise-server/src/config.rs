//! Server configuration for Haulwise.
//!
//! Built once at startup from environment variables and passed into the
//! application state. Handlers never read the environment themselves.

use std::net::SocketAddr;
use std::path::PathBuf;

use haulwise_core::MailAddresses;
use haulwise_mail::DEFAULT_RESEND_API_URL;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Outbound mail transport selection.
    pub mail: MailConfig,
    /// Sender, team inbox, and confirmation reply-to.
    pub addresses: MailAddresses,
    /// Directory holding the built marketing site, if it should be served.
    pub static_dir: Option<PathBuf>,
}

/// Which transport delivers demo-request emails.
#[derive(Clone, PartialEq, Eq)]
pub enum MailConfig {
    /// Resend-compatible HTTPS API. `api_key` is `None` when the credential
    /// is missing, which disables the intake endpoint.
    Resend {
        api_key: Option<String>,
        base_url: String,
    },
    /// Keep messages in memory (local development only).
    Memory,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resend { api_key, base_url } => f
                .debug_struct("Resend")
                .field("api_key", &api_key.as_ref().map(|_| "[redacted]"))
                .field("base_url", base_url)
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FROM: &str = "Haulwise <demo@haulwise.io>";
const DEFAULT_TEAM_TO: &str = "sales@haulwise.io";
const DEFAULT_REPLY_TO: &str = "hello@haulwise.io";

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `HAULWISE_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `HAULWISE_LOG_LEVEL` — log filter (default: `info`)
    /// - `HAULWISE_MAIL_TRANSPORT` — `resend` or `memory` (default: `resend`)
    /// - `RESEND_API_KEY` — provider credential (required by the `resend` transport)
    /// - `RESEND_API_URL` — provider base URL (default: `https://api.resend.com`)
    /// - `DEMO_FROM_EMAIL` — sender address
    /// - `DEMO_TEAM_EMAIL` — operations inbox
    /// - `DEMO_REPLY_TO` — reply-to on the confirmation
    /// - `HAULWISE_STATIC_DIR` — built site to serve at `/` (optional)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    #[must_use]
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Priority: HAULWISE_BIND_ADDR > PORT > default 127.0.0.1:8080
        let bind_addr = if let Some(addr) = var("HAULWISE_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
        } else if let Some(port_str) = var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        };

        let log_level = var("HAULWISE_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let mail = match var("HAULWISE_MAIL_TRANSPORT")
            .unwrap_or_else(|| "resend".to_owned())
            .to_lowercase()
            .as_str()
        {
            "memory" => MailConfig::Memory,
            _ => MailConfig::Resend {
                api_key: var("RESEND_API_KEY"),
                base_url: var("RESEND_API_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_owned()),
            },
        };

        let addresses = MailAddresses {
            from: var("DEMO_FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM.to_owned()),
            team_to: var("DEMO_TEAM_EMAIL").unwrap_or_else(|| DEFAULT_TEAM_TO.to_owned()),
            company_reply_to: var("DEMO_REPLY_TO").unwrap_or_else(|| DEFAULT_REPLY_TO.to_owned()),
        };

        let static_dir = var("HAULWISE_STATIC_DIR").map(PathBuf::from);

        Self {
            bind_addr,
            log_level,
            mail,
            addresses,
            static_dir,
        }
    }
}
