//! Demo-request notification flow.
//!
//! Two sends, strictly in order: the team notification is mandatory and its
//! failure aborts the request; the confirmation to the requester is
//! best-effort and its failure is only logged. Neither is retried.

use std::sync::Arc;

use haulwise_mail::{MailTransport, OutboundEmail};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::IntakeError;
use crate::model::DemoRequest;
use crate::template::{render_lead_confirmation, render_team_notification};

/// Fixed addresses used by the intake flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAddresses {
    /// Sender for both emails.
    pub from: String,
    /// Operations inbox that receives every notification.
    pub team_to: String,
    /// Reply-to on the confirmation, so answers reach a person.
    pub company_reply_to: String,
}

/// Which of the two sends were accepted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendReport {
    pub team: bool,
    pub lead: bool,
}

/// Relays validated demo requests through a mail transport.
#[derive(Clone)]
pub struct DemoRequestService {
    transport: Arc<dyn MailTransport>,
    addresses: MailAddresses,
}

impl std::fmt::Debug for DemoRequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoRequestService")
            .field("addresses", &self.addresses)
            .finish_non_exhaustive()
    }
}

impl DemoRequestService {
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>, addresses: MailAddresses) -> Self {
        Self {
            transport,
            addresses,
        }
    }

    #[must_use]
    pub fn addresses(&self) -> &MailAddresses {
        &self.addresses
    }

    /// Notify the team, then confirm to the requester.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TeamNotification`] if the team email is not
    /// accepted. The confirmation is not attempted in that case.
    pub async fn submit(&self, req: &DemoRequest) -> Result<SendReport, IntakeError> {
        let team = render_team_notification(req);
        let team_email = OutboundEmail {
            from: self.addresses.from.clone(),
            to: vec![self.addresses.team_to.clone()],
            subject: team.subject,
            html: team.html,
            reply_to: Some(req.email.clone()),
        };

        let team_id = self
            .transport
            .send(&team_email)
            .await
            .map_err(IntakeError::TeamNotification)?;

        info!(company = %req.company, message_id = %team_id, "demo request sent to team");

        let lead = render_lead_confirmation(req);
        let lead_email = OutboundEmail {
            from: self.addresses.from.clone(),
            to: vec![req.email.clone()],
            subject: lead.subject,
            html: lead.html,
            reply_to: Some(self.addresses.company_reply_to.clone()),
        };

        let lead_sent = match self.transport.send(&lead_email).await {
            Ok(id) => {
                info!(company = %req.company, message_id = %id, "demo confirmation sent");
                true
            }
            Err(e) => {
                warn!(company = %req.company, error = %e, "demo confirmation failed");
                false
            }
        };

        Ok(SendReport {
            team: true,
            lead: lead_sent,
        })
    }
}
