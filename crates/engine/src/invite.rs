//! Invitations — the start of a session.
//!
//! Sends the response-form link to every participant opted in to the
//! current session. Failures follow the same per-recipient policy as
//! consequence delivery.

use consequences_config::InvitationConfig;
use consequences_core::{Error, Notifier, Result, RosterStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::session::FailedDelivery;

#[derive(Debug, Clone, Serialize)]
pub struct InvitationReport {
    pub session_key: String,
    pub invited: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

/// Fill `{name}` and `{form_url}` in an invitation template.
pub fn render_invitation(template: &str, name: &str, form_url: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{form_url}", form_url)
}

pub async fn send_invitations(
    roster: &dyn RosterStore,
    notifier: &dyn Notifier,
    config: &InvitationConfig,
) -> Result<InvitationReport> {
    if config.form_url.trim().is_empty() {
        return Err(Error::Config {
            message: "invitation.form_url is not set".into(),
        });
    }

    let session_key = roster.session_key().await?;
    let participants = roster.participants(&session_key).await?;
    info!(session = %session_key, participants = participants.len(), "Sending invitations");

    let mut invited = Vec::new();
    let mut failed = Vec::new();

    for participant in participants {
        let body = render_invitation(&config.template, &participant.name, &config.form_url);
        match notifier
            .send(&participant.address, &config.subject, &body)
            .await
        {
            Ok(()) => invited.push(participant.name),
            Err(e) => {
                warn!(participant = %participant.name, error = %e, "Invitation failed");
                failed.push(FailedDelivery {
                    name: participant.name,
                    address: participant.address,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(InvitationReport {
        session_key,
        invited,
        failed,
    })
}
