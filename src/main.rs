use std::sync::Arc;

use marketplace_backoffice::api;
use marketplace_backoffice::config::Config;
use marketplace_backoffice::email::{DisabledEmailSender, EmailSender, ResendEmailSender};
use marketplace_backoffice::error::AppError;
use marketplace_backoffice::observability::logging;
use marketplace_backoffice::state::AppState;
use marketplace_backoffice::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    logging::init(&config);

    let email: Arc<dyn EmailSender> = match &config.email.api_key {
        Some(api_key) => {
            let endpoint = config.email.endpoint.parse().map_err(|err| {
                AppError::Internal(format!("invalid RESEND_ENDPOINT: {err}"))
            })?;
            let sender = ResendEmailSender::new(endpoint, api_key.clone(), config.email.timeout)
                .map_err(|err| AppError::Internal(format!("failed to build email client: {err}")))?;
            Arc::new(sender)
        }
        None => {
            tracing::warn!("RESEND_API_KEY not set; email delivery disabled");
            Arc::new(DisabledEmailSender)
        }
    };

    let app_state = AppState::new(
        Arc::new(MemoryStore::new()),
        email,
        config.email.from.clone(),
        config.event_buffer_size,
    );
    let shared_state = Arc::new(app_state);

    let app = api::rest::router_with_static(shared_state, &config.static_dir);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
