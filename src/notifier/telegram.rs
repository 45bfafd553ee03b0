use std::sync::Arc;

use secstr::SecUtf8;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to send request to Telegram: {0}")]
    Request(String),
    #[error("Telegram API returned error: {status}\n{body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, serde::Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Clone)]
pub struct Telegram {
    http: Arc<awc::Client>,
    url: SecUtf8,
    pub chat_id: String,
    disable_web_page_preview: bool,
}

impl Telegram {
    pub fn new(
        http: Arc<awc::Client>,
        api_url: &str,
        token: &SecUtf8,
        chat_id: String,
        disable_web_page_preview: bool,
    ) -> Self {
        let url = SecUtf8::from(format!(
            "{}/bot{}/sendMessage",
            api_url.trim_end_matches('/'),
            token.unsecure()
        ));
        Self {
            http,
            url,
            chat_id,
            disable_web_page_preview,
        }
    }

    pub async fn deliver(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let message = SendMessage {
            chat_id,
            text,
            disable_web_page_preview: self.disable_web_page_preview,
        };

        let mut resp = self
            .http
            .post(self.url.unsecure())
            .send_json(&message)
            .await
            .map_err(|err| DeliveryError::Request(err.to_string()))?;

        if !resp.status().is_success() {
            let body = resp
                .body()
                .await
                .map(|body| String::from_utf8_lossy(&body).into_owned())
                .unwrap_or_else(|err| format!("<failed to read response body: {}>", err));
            return Err(DeliveryError::Api {
                status: resp.status().as_u16(),
                body,
            });
        }

        Ok(())
    }

    pub async fn notify(self: Arc<Self>, text: String) {
        match self.deliver(&self.chat_id, &text).await {
            Ok(()) => tracing::debug!(chat_id = self.chat_id.as_str(), "Delivered notification"),
            Err(err) => tracing::error!("Failed sending Telegram notification: {}", err),
        }
    }
}
