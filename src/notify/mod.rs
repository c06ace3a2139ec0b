use anyhow::Result;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::ConsultationRequest;

/// Outbound notification side effects for the consultation workflow.
///
/// Every send is fire-and-forget: spawned off the calling task, failures
/// logged, nothing retried. Without an SMTP relay configured each
/// notification degrades to a log line.
#[derive(Clone)]
pub struct Notifier {
    relay: Option<Relay>,
    admin_email: Option<String>,
}

#[derive(Clone)]
struct Relay {
    server: String,
    username: Option<String>,
    password: Option<String>,
    from: String,
}

impl Notifier {
    pub fn from_config(config: &Config) -> Self {
        let relay = match (&config.smtp_server, &config.notify_from) {
            (Some(server), Some(from)) => Some(Relay {
                server: server.clone(),
                username: config.smtp_username.clone(),
                password: config.smtp_password.clone(),
                from: from.clone(),
            }),
            _ => None,
        };

        Self {
            relay,
            admin_email: config.admin_email.clone(),
        }
    }

    /// Log-only notifier.
    pub fn disabled() -> Self {
        Self {
            relay: None,
            admin_email: None,
        }
    }

    /// Tell the admin inbox about a newly submitted request.
    pub fn notify_admin_of_request(&self, request: &ConsultationRequest) {
        let Some(to) = self.admin_email.clone() else {
            info!(
                request_id = request.id,
                requester = %request.requester_name(),
                "new consultation request (no admin address configured)"
            );
            return;
        };

        let subject = format!(
            "New consultation request from {}",
            request.requester_name()
        );
        let body = format!(
            "{} ({}) requested a {} on {} at {}.\n\n{}",
            request.requester_name(),
            request.email,
            request.request_type.label(),
            request.preferred_date,
            request.preferred_time,
            request.message.as_deref().unwrap_or("No message provided."),
        );

        self.dispatch(to, subject, body, request.id);
    }

    /// Tell the requester how their request was reviewed.
    pub fn notify_requester_of_status(&self, request: &ConsultationRequest) {
        let subject = format!("Your consultation request - {}", request.status);
        let body = format!(
            "Hello {},\n\nYour consultation request is now {}.\n\n{}",
            request.requester_name(),
            request.status,
            request.admin_notes.as_deref().unwrap_or(""),
        );

        self.dispatch(request.email.clone(), subject, body, request.id);
    }

    fn dispatch(&self, to: String, subject: String, body: String, request_id: i32) {
        let relay = self.relay.clone();

        tokio::spawn(async move {
            let Some(relay) = relay else {
                info!(request_id, %to, %subject, "notification (no SMTP relay configured)");
                return;
            };

            let outcome =
                tokio::task::spawn_blocking(move || send_mail(&relay, &to, &subject, &body)).await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(request_id, error = %err, "notification send failed"),
                Err(err) => warn!(request_id, error = %err, "notification task failed"),
            }
        });
    }
}

fn send_mail(relay: &Relay, to: &str, subject: &str, body: &str) -> Result<()> {
    let email = Message::builder()
        .from(relay.from.parse()?)
        .to(to.parse()?)
        .subject(subject)
        .body(body.to_string())?;

    let mut transport = SmtpTransport::relay(&relay.server)?;
    if let (Some(username), Some(password)) = (&relay.username, &relay.password) {
        transport = transport.credentials(Credentials::new(username.clone(), password.clone()));
    }

    transport.build().send(&email)?;

    Ok(())
}
