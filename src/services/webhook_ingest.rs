//! Webhook ingest.
//!
//! Single-shot classifier over inbound GitHub webhook deliveries: verify the
//! signature, filter to actionable `issues` subtypes, and mirror the issue
//! into every known local account with one commit for the whole fan-out.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::models::{IssuePayload, IssuesEvent, WebhookAuthMode, WebhookConfig};
use crate::domain::ports::{DatabaseError, UserDirectory};
use crate::infrastructure::webhook::verify_hmac_sha256;
use crate::services::issue_sync::IssueSync;

/// Issue actions that mutate local state. Anything else is acknowledged and
/// ignored.
pub const RECOGNIZED_ISSUE_ACTIONS: &[&str] =
    &["opened", "edited", "labeled", "unlabeled", "closed", "reopened"];

/// Header carrying the HMAC signature of the raw body.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Signature policy, resolved from configuration.
#[derive(Debug, Clone)]
pub enum WebhookAuth {
    /// Deliveries must carry a valid `sha256=` signature over the raw body.
    Enforced { secret: String },
    /// Verification skipped entirely. Explicit insecure opt-out for local
    /// development, never a fallback for a missing secret.
    Disabled,
}

impl WebhookAuth {
    /// Resolve the policy from config. In enforced mode a missing or empty
    /// secret is an error, not a silent bypass.
    pub fn from_config(config: &WebhookConfig) -> Result<Self, IngestError> {
        match config.auth_mode {
            WebhookAuthMode::Disabled => Ok(Self::Disabled),
            WebhookAuthMode::Enforced => match config.secret.as_deref() {
                Some(secret) if !secret.is_empty() => Ok(Self::Enforced {
                    secret: secret.to_string(),
                }),
                _ => Err(IngestError::SecretNotConfigured),
            },
        }
    }
}

/// Acknowledgement returned to the delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub message: String,
}

impl WebhookAck {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced to the webhook boundary.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing {SIGNATURE_HEADER} header")]
    MissingSignature,

    #[error("webhook signature mismatch")]
    InvalidSignature,

    #[error("webhook auth is enforced but no secret is configured")]
    SecretNotConfigured,

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Handles inbound webhook deliveries.
pub struct WebhookIngest {
    auth: WebhookAuth,
    users: Arc<dyn UserDirectory>,
    sync: IssueSync,
}

impl WebhookIngest {
    pub fn new(auth: WebhookAuth, users: Arc<dyn UserDirectory>, sync: IssueSync) -> Self {
        Self { auth, users, sync }
    }

    /// Verify the delivery signature against the raw request body.
    ///
    /// Runs before any payload parsing or data mutation. The comparison is
    /// constant-time via the HMAC verifier.
    pub fn verify_signature(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<(), IngestError> {
        let secret = match &self.auth {
            WebhookAuth::Disabled => return Ok(()),
            WebhookAuth::Enforced { secret } => secret,
        };

        let header = signature_header.ok_or(IngestError::MissingSignature)?;
        let signature = header
            .strip_prefix("sha256=")
            .ok_or(IngestError::InvalidSignature)?;

        if verify_hmac_sha256(secret.as_bytes(), body, signature) {
            Ok(())
        } else {
            Err(IngestError::InvalidSignature)
        }
    }

    /// Verify and dispatch one delivery: raw body plus the `X-GitHub-Event`
    /// and signature headers, exactly the three inputs the transport hands us.
    pub async fn ingest(
        &self,
        event_type: &str,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookAck, IngestError> {
        self.verify_signature(body, signature_header)?;
        let payload: serde_json::Value = serde_json::from_slice(body)?;
        self.handle(event_type, &payload).await
    }

    /// Dispatch an already-authenticated event.
    pub async fn handle(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookAck, IngestError> {
        match event_type {
            "ping" => {
                debug!("webhook ping");
                Ok(WebhookAck::new("Webhook received successfully"))
            }
            "issues" => self.handle_issues_event(payload).await,
            other => {
                debug!(event = other, "ignoring webhook event type");
                Ok(WebhookAck::new(format!("Received {other} event")))
            }
        }
    }

    async fn handle_issues_event(
        &self,
        payload: &serde_json::Value,
    ) -> Result<WebhookAck, IngestError> {
        let event: IssuesEvent = serde_json::from_value(payload.clone())?;

        if !RECOGNIZED_ISSUE_ACTIONS.contains(&event.action.as_str()) {
            debug!(action = %event.action, "ignoring issues action");
            return Ok(WebhookAck::new(format!(
                "Ignoring issues.{} event",
                event.action
            )));
        }

        let number = event.issue.number;
        let issue = IssuePayload::from_raw(event.issue, &event.repository.full_name);

        // There is no repository-to-user ownership mapping yet, so the event
        // is mirrored into every known local account. Known correctness gap.
        // TODO: route by repository owner once webhook installations are
        // recorded per user.
        let users = self.users.list_all().await?;
        let user_ids: Vec<i64> = users.iter().map(|u| u.id).collect();

        let results = self.sync.fan_out(&user_ids, &issue).await?;
        let created = results.iter().filter(|(_, created)| *created).count();

        info!(
            action = %event.action,
            github_issue_id = issue.github_issue_id,
            users = user_ids.len(),
            created,
            updated = results.len() - created,
            "processed issues event"
        );

        Ok(WebhookAck::new(format!(
            "Successfully processed {} event for issue #{number}",
            event.action
        )))
    }
}
