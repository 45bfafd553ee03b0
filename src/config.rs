use std::net::SocketAddr;

use secstr::SecUtf8;
use serde::{Deserialize, Deserializer};

use crate::notifier;

pub const ENV_PREFIX: &str = "LABGRAM_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default, deserialize_with = "deserialize_opt_secutf8")]
    pub telegram_token: Option<SecUtf8>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default)]
    pub disable_web_page_preview: bool,
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    pub fn notifier(&self) -> notifier::Config {
        notifier::Config {
            telegram_token: self.telegram_token.clone(),
            telegram_chat_id: self.telegram_chat_id.clone(),
            telegram_api_url: self.telegram_api_url.clone(),
            disable_web_page_preview: self.disable_web_page_preview,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".into()
}

fn default_max_payload_bytes() -> usize {
    1024 * 1024
}

fn deserialize_opt_secutf8<'de, D>(de: D) -> Result<Option<SecUtf8>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(|o| o.map(SecUtf8::from))
}
