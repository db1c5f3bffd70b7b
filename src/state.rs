use std::sync::Arc;

use crate::email::{DisabledEmailSender, EmailSender};
use crate::observability::metrics::Metrics;
use crate::services::notification::Notifier;
use crate::store::{MemoryStore, Store};

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Notifier,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        email: Arc<dyn EmailSender>,
        email_from: String,
        event_buffer_size: usize,
    ) -> Self {
        let metrics = Metrics::new();
        let notifier = Notifier::new(
            store.clone(),
            email,
            email_from,
            event_buffer_size,
            metrics.clone(),
        );

        Self {
            store,
            notifier,
            metrics,
        }
    }

    /// Empty in-memory tables with email delivery switched off.
    pub fn in_memory(event_buffer_size: usize) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(DisabledEmailSender),
            "Marketplace <noreply@marketplace.local>".to_string(),
            event_buffer_size,
        )
    }
}
