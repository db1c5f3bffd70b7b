use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::email::{EmailError, EmailMessage, EmailSender};

/// Resend REST adapter: bearer-authenticated JSON POST of `{from, to, subject, html}`.
pub struct ResendEmailSender {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

impl ResendEmailSender {
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<Option<String>, EmailError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).chars().take(512).collect(),
            });
        }

        Ok(serde_json::from_slice::<ResendResponse>(&body)
            .ok()
            .and_then(|decoded| decoded.id))
    }
}
