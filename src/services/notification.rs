//! In-app notification rows plus optional email.
//!
//! Dispatch never fails the caller: every failure is logged and reported in
//! the returned [`DispatchOutcome`], and either channel may succeed alone.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::email::templates::{render_html, Notice};
use crate::email::{EmailError, EmailMessage, EmailSender};
use crate::error::AppError;
use crate::models::notification::{EmailStatus, Notification, NotificationKind};
use crate::observability::metrics::Metrics;
use crate::state::AppState;
use crate::store::Store;

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRequest {
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[serde(default, alias = "type")]
    pub kind: NotificationKind,
    pub email: Option<String>,
}

impl NotificationRequest {
    pub fn from_notice(
        user_id: Uuid,
        notice: Notice,
        kind: NotificationKind,
        email: Option<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            title: notice.title,
            message: notice.message,
            kind,
            email,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub db: bool,
    pub email: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn Store>,
    email: Arc<dyn EmailSender>,
    from: String,
    events_tx: broadcast::Sender<Notification>,
    metrics: Metrics,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn Store>,
        email: Arc<dyn EmailSender>,
        from: String,
        event_buffer_size: usize,
        metrics: Metrics,
    ) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size.max(1));
        Self {
            store,
            email,
            from,
            events_tx,
            metrics,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events_tx.subscribe()
    }

    pub async fn send(&self, request: NotificationRequest) -> DispatchOutcome {
        let Some(user_id) = request.user_id else {
            warn!(title = %request.title, "notification skipped: missing user id");
            self.metrics.record_notification("db", "skipped");
            return DispatchOutcome {
                db: false,
                email: false,
                error: Some("missing user id".to_string()),
            };
        };

        let email = request.email.filter(|address| !address.trim().is_empty());
        let mut errors = Vec::new();

        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            title: request.title.clone(),
            message: request.message.clone(),
            kind: request.kind,
            read: false,
            email_status: if email.is_some() {
                EmailStatus::Sent
            } else {
                EmailStatus::None
            },
            created_at: Utc::now(),
        };

        let db = match self.store.insert_notification(notification.clone()).await {
            Ok(()) => {
                self.metrics.record_notification("db", "success");
                let _ = self.events_tx.send(notification);
                true
            }
            Err(err) => {
                self.metrics.record_notification("db", "error");
                error!(user_id = %user_id, error = %err, "failed to insert notification");
                errors.push(format!("db: {err}"));
                false
            }
        };

        let email_sent = match email {
            Some(to) => {
                let html = render_html(&request.title, &request.message);
                match self.send_email(&to, &request.title, &html).await {
                    Ok(_) => true,
                    Err(err) => {
                        errors.push(format!("email: {err}"));
                        false
                    }
                }
            }
            None => {
                self.metrics.record_notification("email", "skipped");
                false
            }
        };

        DispatchOutcome {
            db,
            email: email_sent,
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }

    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<Option<String>, EmailError> {
        let message = EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        };

        match self.email.send(message).await {
            Ok(message_id) => {
                self.metrics.record_notification("email", "success");
                info!(to = %to, message_id = ?message_id, "email sent");
                Ok(message_id)
            }
            Err(err) => {
                self.metrics.record_notification("email", "error");
                warn!(to = %to, error = %err, "failed to send email");
                Err(err)
            }
        }
    }

    /// Background dispatch. An incomplete outcome is logged inside the task;
    /// callers may drop the handle.
    pub fn spawn(&self, request: NotificationRequest) -> JoinHandle<DispatchOutcome> {
        let notifier = self.clone();
        tokio::spawn(async move {
            let user_id = request.user_id;
            let outcome = notifier.send(request).await;
            log_incomplete(user_id, &outcome);
            outcome
        })
    }

    /// Fire-and-forget dispatch. The recipient's email is looked up from
    /// their profile inside the task.
    pub fn spawn_for_user(&self, user_id: Uuid, notice: Notice, kind: NotificationKind) {
        let notifier = self.clone();
        tokio::spawn(async move {
            let email = profile_email(notifier.store.as_ref(), user_id).await;
            let outcome = notifier
                .send(NotificationRequest::from_notice(user_id, notice, kind, email))
                .await;
            log_incomplete(Some(user_id), &outcome);
        });
    }
}

fn log_incomplete(user_id: Option<Uuid>, outcome: &DispatchOutcome) {
    if let Some(err) = &outcome.error {
        warn!(user_id = ?user_id, error = %err, "background notification incomplete");
    }
}

/// Missing profiles and store failures both read as "no email".
pub async fn profile_email(store: &dyn Store, user_id: Uuid) -> Option<String> {
    match store.get_profile(user_id).await {
        Ok(profile) => profile.and_then(|profile| profile.email),
        Err(err) => {
            warn!(user_id = %user_id, error = %err, "failed to load profile email");
            None
        }
    }
}

pub async fn list_notifications(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<Notification>, AppError> {
    let mut notifications = state.store.list_notifications(user_id).await?;
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(notifications)
}

pub async fn mark_read(state: &AppState, id: Uuid) -> Result<Notification, AppError> {
    Ok(state.store.mark_notification_read(id).await?)
}
