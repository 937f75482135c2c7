//! Outbound candidate notifications.
//!
//! `SmtpNotifier` sends through an async STARTTLS relay; `LogNotifier` is used
//! when no SMTP host is configured and only records what would have been sent.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::SmtpSettings;
use crate::models::interview::{Interview, InterviewMode};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to_name: String,
    pub to_email: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        let from = Mailbox::new(
            Some(settings.from_name.clone()),
            settings.from_email.parse::<Address>()?,
        );
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        let to = Mailbox::new(Some(message.to_name), message.to_email.parse::<Address>()?);
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html_body)?;

        self.transport.send(email).await?;
        info!("Email sent to {}", message.to_email);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        info!(
            "SMTP not configured; would email {} <{}>: {}",
            message.to_name, message.to_email, message.subject
        );
        Ok(())
    }
}

pub const INTERVIEW_SUBJECT: &str = "Interview Scheduled - HireFlow";

pub fn interview_scheduled_email(
    candidate_name: &str,
    candidate_email: &str,
    job_title: &str,
    interview: &Interview,
) -> EmailMessage {
    let place_label = match interview.mode {
        InterviewMode::Online => "Meeting Link",
        InterviewMode::Offline => "Location",
    };
    let html_body = format!(
        "<h3>Interview Scheduled</h3>\
         <p>Dear {name},</p>\
         <p>An interview has been scheduled for the position of <strong>{title}</strong>.</p>\
         <p><strong>Date &amp; Time:</strong> {when}</p>\
         <p><strong>Mode:</strong> {mode}</p>\
         <p><strong>{place_label}:</strong> {place}</p>\
         <p>Good luck!</p>",
        name = escape_html(candidate_name),
        title = escape_html(job_title),
        when = interview.scheduled_at.format("%Y-%m-%d %H:%M UTC"),
        mode = interview.mode,
        place = escape_html(interview.meeting_link.as_deref().unwrap_or("To be confirmed")),
    );

    EmailMessage {
        to_name: candidate_name.to_string(),
        to_email: candidate_email.to_string(),
        subject: INTERVIEW_SUBJECT.to_string(),
        html_body,
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
